//! Snapshot download: fetch the archive, unpack it beside the target, and
//! move the single top-level directory into place.
use std::path::Path;

use super::ActionExecutor;
use crate::error::SyncError;
use crate::logging::Log;
use crate::manifest::RepositoryDescriptor;

impl ActionExecutor {
    /// Download and unpack a snapshot of `descriptor` into its target path.
    ///
    /// The archive lands at `<base>/<rel>.zip` and is unpacked into
    /// `<base>/<rel>.tmp`. Both are removed afterwards whatever the result.
    /// No staging directory is created unless the download completed.
    pub(super) fn static_fetch(
        &self,
        descriptor: &RepositoryDescriptor,
        log: &dyn Log,
    ) -> Result<(), SyncError> {
        let rel = descriptor.relative_path();
        let archive = self.base_dir.join(format!("{rel}.zip"));
        let staging = self.base_dir.join(format!("{rel}.tmp"));
        let url = descriptor.archive_url(&self.remote_base);

        log.info(&format!("Downloading {}", descriptor.name()));
        let downloaded = self.downloader.download(&url, &archive, &|n| {
            log.progress(&format!("Downloaded: {n} bytes"));
        });
        match downloaded {
            Ok(total) => log.debug(&format!("{url}: {total} bytes")),
            Err(e) => {
                self.remove_leftover(&archive, false, log);
                return Err(e);
            }
        }

        let result = self.unpack(descriptor, &archive, &staging);
        self.remove_leftover(&staging, true, log);
        self.remove_leftover(&archive, false, log);
        result
    }

    fn unpack(
        &self,
        descriptor: &RepositoryDescriptor,
        archive: &Path,
        staging: &Path,
    ) -> Result<(), SyncError> {
        self.extractor.extract(archive, staging)?;

        let root = staging.join(descriptor.archive_root());
        if !self.fs.exists(&root) {
            return Err(SyncError::Extract(format!(
                "archive has no top-level '{}'",
                descriptor.archive_root()
            )));
        }
        let target = self.target_path(descriptor);
        self.fs.rename(&root, &target).map_err(|e| {
            SyncError::Extract(format!("cannot move into {}: {e}", target.display()))
        })
    }

    /// Best-effort removal of a temporary file or directory.
    fn remove_leftover(&self, path: &Path, is_dir: bool, log: &dyn Log) {
        if !self.fs.exists(path) {
            return;
        }
        let removed = if is_dir {
            self.fs.remove_dir_all(path)
        } else {
            self.fs.remove_file(path)
        };
        if let Err(e) = removed {
            log.warn(&format!("could not remove {}: {e}", path.display()));
        }
    }
}
