//! Library table parsing: raw manifest text into [`RepositoryDescriptor`]s.
//!
//! Each line is tokenized and scanned for a `lib` entry carrying `name`,
//! `type`, `uri` and `descr` fields, written either as a `(lib ...)` form
//! or as a bare `lib` followed by its fields. Lines that do not describe a
//! remotely hosted library are dropped without error.
pub mod lexer;

use serde::Serialize;

use crate::error::SyncError;
use lexer::Node;

/// Type tag identifying a remotely hosted entry.
const REMOTE_TYPE: &str = "Github";

/// Variable prefix that every remote `uri` must start with.
const REMOTE_URI_PREFIX: &str = "${KIGITHUB}/";

/// One library entry from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDescriptor {
    name: String,
    relative_path: String,
    description: String,
    is_deprecated: bool,
}

impl RepositoryDescriptor {
    /// Create a descriptor, deriving the deprecation flag from `description`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        relative_path: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        let is_deprecated = description.to_lowercase().contains("deprecated");
        Self {
            name: name.into(),
            relative_path: relative_path.into(),
            description,
            is_deprecated,
        }
    }

    /// Library name (unique within a manifest).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path segment used both for the remote lookup and the local directory.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// `true` if the description mentions "deprecated" in any letter case.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.is_deprecated
    }

    /// Version-controlled remote, e.g. `https://github.com/KiCad/Foo.pretty`.
    #[must_use]
    pub fn remote_url(&self, base: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), self.relative_path)
    }

    /// Snapshot archive URL for the default branch.
    #[must_use]
    pub fn archive_url(&self, base: &str) -> String {
        format!("{}/archive/master.zip", self.remote_url(base))
    }

    /// Name of the single top-level folder inside the snapshot archive.
    #[must_use]
    pub fn archive_root(&self) -> String {
        format!("{}-master", self.relative_path)
    }
}

/// Validate that raw manifest bytes are UTF-8 text.
///
/// # Errors
///
/// Returns [`SyncError::ManifestUnreadable`] if the bytes are not valid UTF-8.
pub fn decode(bytes: &[u8]) -> Result<&str, SyncError> {
    std::str::from_utf8(bytes).map_err(|e| SyncError::ManifestUnreadable(e.to_string()))
}

/// Lazily parse manifest text, one descriptor per matching line.
///
/// # Examples
///
/// ```
/// use prettylibs_cli::manifest;
///
/// let text = "(fp_lib_table\n  (lib (name A)(type Github)(uri ${KIGITHUB}/A.pretty)(options \"\")(descr \"Things\"))\n)";
/// let libs: Vec<_> = manifest::parse(text).collect();
/// assert_eq!(libs.len(), 1);
/// assert_eq!(libs[0].relative_path(), "A.pretty");
/// ```
pub fn parse(text: &str) -> impl Iterator<Item = RepositoryDescriptor> + '_ {
    text.lines().filter_map(parse_line)
}

/// Parse a single line, returning `None` if it is not a remote library entry.
#[must_use]
pub fn parse_line(line: &str) -> Option<RepositoryDescriptor> {
    let nodes = lexer::build(lexer::tokenize(line)?);
    let lib = find_lib(&nodes)?;
    descriptor_from_lib(lib)
}

/// Depth-first search for the first `lib` keyword; its fields are the
/// nodes that follow it at the same level.
fn find_lib(nodes: &[Node]) -> Option<&[Node]> {
    nodes.iter().enumerate().find_map(|(i, node)| match node {
        Node::Value(word) if word == "lib" => nodes.get(i + 1..),
        Node::Value(_) => None,
        Node::List(items) => find_lib(items),
    })
}

/// Look up the value of a `(key value)` child.
fn field<'a>(children: &'a [Node], key: &str) -> Option<&'a str> {
    children.iter().find_map(|child| match child.as_list()? {
        [Node::Value(k), Node::Value(v)] if k == key => Some(v.as_str()),
        _ => None,
    })
}

fn descriptor_from_lib(children: &[Node]) -> Option<RepositoryDescriptor> {
    let name = field(children, "name")?;
    if field(children, "type")? != REMOTE_TYPE {
        return None;
    }
    let path = field(children, "uri")?.strip_prefix(REMOTE_URI_PREFIX)?;
    let description = field(children, "descr")?;

    if name.is_empty() || !is_single_segment(path) {
        return None;
    }
    Some(RepositoryDescriptor::new(name, path, description))
}

/// A relative path must name exactly one directory below the base.
fn is_single_segment(path: &str) -> bool {
    !path.is_empty() && path != "." && path != ".." && !path.contains(['/', '\\'])
}
