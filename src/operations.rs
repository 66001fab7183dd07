//! Filesystem operation abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that the sync core can be
//! unit-tested without touching the real filesystem.  Production code uses
//! [`SystemFileSystemOps`]; tests use `MockFileSystemOps`.

use std::path::Path;

/// Abstraction over the filesystem calls made while synchronizing.
pub trait FileSystemOps: Send + Sync + std::fmt::Debug {
    /// Returns `true` if `path` exists on the filesystem.
    fn exists(&self, path: &Path) -> bool;

    /// Rename `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the rename fails.
    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()>;

    /// Remove a single file.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_file(&self, path: &Path) -> std::io::Result<()>;

    /// Remove a directory and everything below it.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        std::fs::rename(from, to)
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()> {
        std::fs::remove_dir_all(path)
    }
}

/// Mock [`FileSystemOps`] for unit tests.
///
/// Pre-configure existing paths with [`with_existing`](Self::with_existing);
/// mutating calls are recorded and succeed.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockFileSystemOps {
    existing: std::sync::Mutex<std::collections::HashSet<std::path::PathBuf>>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockFileSystemOps {
    /// Create an empty mock with nothing configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `path` as existing.
    #[must_use]
    pub fn with_existing(self, path: impl Into<std::path::PathBuf>) -> Self {
        self.existing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(path.into());
        self
    }

    /// Mutating calls made so far, formatted as `op path`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }
}

#[cfg(test)]
impl FileSystemOps for MockFileSystemOps {
    fn exists(&self, path: &Path) -> bool {
        self.existing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> std::io::Result<()> {
        self.record(format!("rename {} {}", from.display(), to.display()));
        let mut existing = self
            .existing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        existing.remove(from);
        existing.insert(to.to_path_buf());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> std::io::Result<()> {
        self.record(format!("remove_file {}", path.display()));
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> std::io::Result<()> {
        self.record(format!("remove_dir_all {}", path.display()));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn system_ops_rename_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("a.tmp");
        let to = dir.path().join("a");
        std::fs::create_dir(&from).unwrap();
        std::fs::write(from.join("f"), "x").unwrap();

        let ops = SystemFileSystemOps;
        ops.rename(&from, &to).unwrap();
        assert!(!ops.exists(&from));
        assert!(ops.exists(&to));

        ops.remove_dir_all(&to).unwrap();
        assert!(!ops.exists(&to));
    }

    #[test]
    fn system_ops_remove_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("lib.zip");
        std::fs::write(&file, b"zip").unwrap();
        SystemFileSystemOps.remove_file(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn mock_tracks_existence_and_calls() {
        let ops = MockFileSystemOps::new().with_existing("/libs/A.pretty");
        assert!(ops.exists(Path::new("/libs/A.pretty")));
        assert!(!ops.exists(Path::new("/libs/B.pretty")));

        ops.rename(Path::new("/libs/A.pretty"), Path::new("/libs/B.pretty"))
            .unwrap();
        assert!(ops.exists(Path::new("/libs/B.pretty")));
        assert_eq!(ops.calls(), vec!["rename /libs/A.pretty /libs/B.pretty"]);
    }
}
