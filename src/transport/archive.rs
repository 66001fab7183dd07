//! Archive extraction capability.
use std::fs::File;
use std::path::Path;

use crate::error::SyncError;

/// Unpacks a downloaded snapshot archive.
pub trait Extractor: Send + Sync + std::fmt::Debug {
    /// Extract every entry of `archive` below `dest`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Extract`] if the archive cannot be opened, is
    /// malformed, or an entry cannot be written.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), SyncError>;
}

/// [`Extractor`] for zip archives.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipExtractor;

impl Extractor for ZipExtractor {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), SyncError> {
        let err = |e: &dyn std::fmt::Display| {
            SyncError::Extract(format!("{}: {e}", archive.display()))
        };
        let file = File::open(archive).map_err(|e| err(&e))?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| err(&e))?;
        zip.extract(dest).map_err(|e| err(&e))
    }
}
