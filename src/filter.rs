//! Include/exclude/deprecation filtering of manifest entries.
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::ConfigError;
use crate::manifest::RepositoryDescriptor;

/// Why an entry was not acted upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The target directory is already present.
    AlreadyExists,
    /// The entry is deprecated and deprecated entries were not requested.
    DeprecatedExcluded,
    /// The name does not match the include pattern.
    IncludeFiltered,
    /// The name matches the exclude pattern.
    ExcludeFiltered,
    /// The run only lists entries.
    ListOnly,
    /// An earlier entry in the manifest uses the same relative path.
    DuplicatePath,
    /// The run was interrupted before this entry started.
    Interrupted,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::AlreadyExists => "already exists",
            Self::DeprecatedExcluded => "deprecated",
            Self::IncludeFiltered => "does not match include filter",
            Self::ExcludeFiltered => "matches ignore filter",
            Self::ListOnly => "list only",
            Self::DuplicatePath => "duplicate path",
            Self::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

/// User-supplied selection rules, fixed for the whole run.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    include: Option<Regex>,
    exclude: Option<Regex>,
    include_deprecated: bool,
}

impl FilterSpec {
    /// Compile the include and exclude patterns case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if either pattern fails to compile.
    pub fn new(
        include: Option<&str>,
        exclude: Option<&str>,
        include_deprecated: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            include: include.map(|p| compile("include", p)).transpose()?,
            exclude: exclude.map(|p| compile("exclude", p)).transpose()?,
            include_deprecated,
        })
    }

    /// Whether deprecated entries were requested.
    #[must_use]
    pub const fn include_deprecated(&self) -> bool {
        self.include_deprecated
    }
}

fn compile(kind: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ConfigError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Decide whether `descriptor` is in scope, and if not, why.
///
/// Rules short-circuit in order: include pattern, exclude pattern, then
/// deprecation.
///
/// # Errors
///
/// Returns the [`SkipReason`] of the first rule that excludes the entry.
pub fn evaluate(
    descriptor: &RepositoryDescriptor,
    spec: &FilterSpec,
    allow_deprecated: bool,
) -> Result<(), SkipReason> {
    let name = descriptor.name();
    if let Some(include) = &spec.include
        && !include.is_match(name)
    {
        return Err(SkipReason::IncludeFiltered);
    }
    if let Some(exclude) = &spec.exclude
        && exclude.is_match(name)
    {
        return Err(SkipReason::ExcludeFiltered);
    }
    if !allow_deprecated && descriptor.is_deprecated() {
        return Err(SkipReason::DeprecatedExcluded);
    }
    Ok(())
}

/// Boolean form of [`evaluate`].
#[must_use]
pub fn should_process(
    descriptor: &RepositoryDescriptor,
    spec: &FilterSpec,
    allow_deprecated: bool,
) -> bool {
    evaluate(descriptor, spec, allow_deprecated).is_ok()
}
