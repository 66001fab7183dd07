//! Version-controlled clone of a missing library.
use super::ActionExecutor;
use crate::error::SyncError;
use crate::logging::Log;
use crate::manifest::RepositoryDescriptor;

impl ActionExecutor {
    /// Clone the remote for `descriptor` into its target directory.
    pub(super) fn clone_repo(
        &self,
        descriptor: &RepositoryDescriptor,
        log: &dyn Log,
    ) -> Result<(), SyncError> {
        let url = descriptor.remote_url(&self.remote_base);
        log.info(&format!("Cloning {}", descriptor.relative_path()));
        self.vcs.clone_repo(&url, &self.target_path(descriptor), log)
    }
}
