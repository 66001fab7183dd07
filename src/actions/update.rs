//! Pull into an existing working copy.
use super::ActionExecutor;
use crate::error::SyncError;
use crate::logging::Log;
use crate::manifest::RepositoryDescriptor;

impl ActionExecutor {
    /// Pull upstream changes into the existing copy of `descriptor`.
    ///
    /// A missing target fails with [`SyncError::NotFound`] before any
    /// transport call.
    pub(super) fn update(
        &self,
        descriptor: &RepositoryDescriptor,
        log: &dyn Log,
    ) -> Result<(), SyncError> {
        let target = self.target_path(descriptor);
        log.info(&format!("Updating {}", descriptor.relative_path()));
        if !self.fs.exists(&target) {
            return Err(SyncError::NotFound(target));
        }
        self.vcs.pull(&target, log)
    }
}
