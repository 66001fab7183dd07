//! Version-control capability: clone a remote, pull into a working copy.
use std::path::Path;
use std::sync::Arc;

use crate::error::SyncError;
use crate::exec::{ExecResult, Executor};
use crate::logging::Log;

/// Clone and update operations on remote repositories.
pub trait Vcs: Send + Sync + std::fmt::Debug {
    /// Clone `url` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if the clone fails.
    fn clone_repo(&self, url: &str, dest: &Path, log: &dyn Log) -> Result<(), SyncError>;

    /// Pull the upstream branch into the working copy at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Transport`] if `path` is not a repository or the
    /// pull fails.
    fn pull(&self, path: &Path, log: &dyn Log) -> Result<(), SyncError>;
}

/// [`Vcs`] backed by the `git` command line.
#[derive(Debug, Clone)]
pub struct GitCli {
    executor: Arc<dyn Executor>,
}

impl GitCli {
    /// Create a git backend that runs commands through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    /// Whether a `git` binary is available.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.executor.which("git")
    }
}

/// Forward command output to the log at debug level.
fn forward_output(result: &ExecResult, log: &dyn Log) {
    for line in result.lines() {
        log.debug(&format!("git: {line}"));
    }
}

impl Vcs for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path, log: &dyn Log) -> Result<(), SyncError> {
        let dest_str = dest.to_string_lossy();
        log.debug(&format!("git clone {url} {dest_str}"));
        let result = self
            .executor
            .run("git", &["clone", url, &dest_str])
            .map_err(|e| SyncError::Transport(format!("{e:#}")))?;
        forward_output(&result, log);
        Ok(())
    }

    fn pull(&self, path: &Path, log: &dyn Log) -> Result<(), SyncError> {
        git2::Repository::open(path).map_err(|e| {
            SyncError::Transport(format!(
                "{} is not a git repository: {}",
                path.display(),
                e.message()
            ))
        })?;

        log.debug(&format!("pulling in {}", path.display()));
        let result = self
            .executor
            .run_in(path, "git", &["pull", "--ff-only"])
            .map_err(|e| SyncError::Transport(format!("{e:#}")))?;
        forward_output(&result, log);
        Ok(())
    }
}
