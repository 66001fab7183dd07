//! Per-entry actions: clone, static snapshot, update.
//!
//! Every action runs through [`ActionExecutor::execute`], which converts any
//! [`SyncError`] into an [`ActionOutcome::Failed`] so that one entry can never
//! abort the batch.
mod clone;
mod static_fetch;
mod update;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::error::SyncError;
use crate::filter::SkipReason;
use crate::logging::Log;
use crate::manifest::RepositoryDescriptor;
use crate::operations::FileSystemOps;
use crate::planner::Action;
use crate::transport::{Downloader, Extractor, Vcs};

/// Category of a per-entry failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Clone or pull failed.
    Transport,
    /// Snapshot download failed.
    Download,
    /// Snapshot extraction or move failed.
    Extract,
    /// Update target missing locally.
    NotFound,
}

/// Why an action failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReason {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<SyncError> for FailureReason {
    fn from(err: SyncError) -> Self {
        let kind = match &err {
            SyncError::Transport(_) | SyncError::ManifestUnreadable(_) => FailureKind::Transport,
            SyncError::Download(_) => FailureKind::Download,
            SyncError::Extract(_) => FailureKind::Extract,
            SyncError::NotFound(_) => FailureKind::NotFound,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of processing one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum ActionOutcome {
    /// Nothing was done.
    Skipped(SkipReason),
    /// The action completed.
    Succeeded,
    /// The action failed; the run continues.
    Failed(FailureReason),
}

impl ActionOutcome {
    /// Shorthand for a failure of `kind`.
    #[must_use]
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failed(FailureReason {
            kind,
            message: message.into(),
        })
    }
}

/// Runs planned actions against the external capabilities.
#[derive(Debug, Clone)]
pub struct ActionExecutor {
    base_dir: PathBuf,
    remote_base: String,
    vcs: Arc<dyn Vcs>,
    downloader: Arc<dyn Downloader>,
    extractor: Arc<dyn Extractor>,
    fs: Arc<dyn FileSystemOps>,
}

impl ActionExecutor {
    /// Create an executor that writes below `base_dir` and resolves remotes
    /// against `remote_base`.
    #[must_use]
    pub fn new(
        base_dir: impl Into<PathBuf>,
        remote_base: impl Into<String>,
        vcs: Arc<dyn Vcs>,
        downloader: Arc<dyn Downloader>,
        extractor: Arc<dyn Extractor>,
        fs: Arc<dyn FileSystemOps>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            remote_base: remote_base.into(),
            vcs,
            downloader,
            extractor,
            fs,
        }
    }

    /// Local directory for `descriptor`.
    #[must_use]
    pub fn target_path(&self, descriptor: &RepositoryDescriptor) -> PathBuf {
        self.base_dir.join(descriptor.relative_path())
    }

    /// Whether the local directory for `descriptor` already exists.
    #[must_use]
    pub fn exists_locally(&self, descriptor: &RepositoryDescriptor) -> bool {
        self.fs.exists(&self.target_path(descriptor))
    }

    /// Carry out `action` for `descriptor`.
    ///
    /// Never fails: capability errors become [`ActionOutcome::Failed`].
    pub fn execute(
        &self,
        descriptor: &RepositoryDescriptor,
        action: Action,
        log: &dyn Log,
    ) -> ActionOutcome {
        let result = match action {
            Action::List => {
                log.info(&format!("Found '{}'", descriptor.name()));
                return ActionOutcome::Skipped(SkipReason::ListOnly);
            }
            Action::Skip(reason) => return ActionOutcome::Skipped(reason),
            Action::Clone => self.clone_repo(descriptor, log),
            Action::StaticFetch => self.static_fetch(descriptor, log),
            Action::Update => self.update(descriptor, log),
        };
        match result {
            Ok(()) => ActionOutcome::Succeeded,
            Err(e) => ActionOutcome::Failed(e.into()),
        }
    }
}

/// Shared stub capabilities for action and orchestrator unit tests.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    /// [`Vcs`] stub recording every call; fails when `fail` is set.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingVcs {
        pub(crate) calls: Mutex<Vec<String>>,
        pub(crate) fail: bool,
    }

    impl RecordingVcs {
        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }

        fn record(&self, call: String) -> Result<(), SyncError> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(call);
            if self.fail {
                Err(SyncError::Transport("remote hung up".to_string()))
            } else {
                Ok(())
            }
        }
    }

    impl Vcs for RecordingVcs {
        fn clone_repo(&self, url: &str, dest: &Path, _: &dyn Log) -> Result<(), SyncError> {
            self.record(format!("clone {url} {}", dest.display()))
        }

        fn pull(&self, path: &Path, _: &dyn Log) -> Result<(), SyncError> {
            self.record(format!("pull {}", path.display()))
        }
    }

    /// [`Downloader`] stub that writes fixed bytes, or fails when `None`.
    #[derive(Debug, Default)]
    pub(crate) struct StubDownloader {
        pub(crate) bytes: Option<Vec<u8>>,
        pub(crate) calls: Mutex<Vec<String>>,
    }

    impl StubDownloader {
        pub(crate) fn serving(bytes: Vec<u8>) -> Self {
            Self {
                bytes: Some(bytes),
                ..Self::default()
            }
        }

        pub(crate) fn call_count(&self) -> usize {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .len()
        }
    }

    impl Downloader for StubDownloader {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, SyncError> {
            self.calls
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(url.to_string());
            self.bytes
                .clone()
                .ok_or_else(|| SyncError::Download(format!("{url}: 503")))
        }

        fn download(
            &self,
            url: &str,
            dest: &Path,
            progress: &dyn Fn(u64),
        ) -> Result<u64, SyncError> {
            let bytes = self.fetch(url)?;
            std::fs::write(dest, &bytes).map_err(|e| SyncError::Download(e.to_string()))?;
            let len = u64::try_from(bytes.len()).unwrap_or(0);
            progress(len);
            Ok(len)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::test_support::{RecordingVcs, StubDownloader};
    use super::*;
    use crate::logging::MemoryLog;
    use crate::operations::MockFileSystemOps;
    use crate::transport::ZipExtractor;

    fn executor(vcs: Arc<RecordingVcs>, fs: MockFileSystemOps) -> ActionExecutor {
        ActionExecutor::new(
            "/libs",
            "https://github.com/KiCad",
            vcs,
            Arc::new(StubDownloader::default()),
            Arc::new(ZipExtractor),
            Arc::new(fs),
        )
    }

    fn lib() -> RepositoryDescriptor {
        RepositoryDescriptor::new("A", "A.pretty", "things")
    }

    #[test]
    fn list_reports_name_without_transport() {
        let vcs = Arc::new(RecordingVcs::default());
        let log = MemoryLog::default();
        let outcome =
            executor(vcs.clone(), MockFileSystemOps::new()).execute(&lib(), Action::List, &log);
        assert_eq!(outcome, ActionOutcome::Skipped(SkipReason::ListOnly));
        assert!(log.contains("Found 'A'"));
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn skip_passes_reason_through() {
        let vcs = Arc::new(RecordingVcs::default());
        let outcome = executor(vcs.clone(), MockFileSystemOps::new()).execute(
            &lib(),
            Action::Skip(SkipReason::AlreadyExists),
            &MemoryLog::default(),
        );
        assert_eq!(outcome, ActionOutcome::Skipped(SkipReason::AlreadyExists));
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn target_path_and_existence() {
        let exec = executor(
            Arc::new(RecordingVcs::default()),
            MockFileSystemOps::new().with_existing("/libs/A.pretty"),
        );
        assert_eq!(exec.target_path(&lib()), PathBuf::from("/libs/A.pretty"));
        assert!(exec.exists_locally(&lib()));
        assert!(!exec.exists_locally(&RepositoryDescriptor::new("B", "B.pretty", "")));
    }

    #[test]
    fn failure_reason_from_sync_error() {
        let reason = FailureReason::from(SyncError::NotFound(PathBuf::from("/libs/A.pretty")));
        assert_eq!(reason.kind, FailureKind::NotFound);
        assert_eq!(reason.to_string(), "'/libs/A.pretty' does not exist");
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_string(&ActionOutcome::Skipped(SkipReason::DeprecatedExcluded))
            .unwrap();
        assert_eq!(json, r#"{"outcome":"skipped","reason":"deprecated_excluded"}"#);
        let json = serde_json::to_string(&ActionOutcome::Succeeded).unwrap();
        assert_eq!(json, r#"{"outcome":"succeeded"}"#);
    }
}
