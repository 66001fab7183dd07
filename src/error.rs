//! Domain-specific error types for the library synchronizer.
//!
//! Core modules return typed errors built with [`thiserror`]; the command
//! layer at the CLI boundary converts them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! SyncError
//! ├── ManifestUnreadable — manifest could not be fetched or decoded (fatal)
//! ├── Transport          — clone/pull or network failure (per entry)
//! ├── Download           — archive download failure (per entry)
//! ├── Extract            — archive extraction or rename failure (per entry)
//! └── NotFound           — update target missing locally (per entry)
//!
//! ConfigError            — invalid run configuration (fatal, at startup)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while synchronizing the catalog.
///
/// Only [`SyncError::ManifestUnreadable`] aborts a run; every other variant
/// is caught at the action boundary and recorded against a single entry.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The manifest could not be fetched or is not valid UTF-8 text.
    #[error("manifest unreadable: {0}")]
    ManifestUnreadable(String),

    /// The version control capability or the network failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The snapshot archive could not be downloaded.
    #[error("download failed: {0}")]
    Download(String),

    /// The snapshot archive could not be extracted or moved into place.
    #[error("extract failed: {0}")]
    Extract(String),

    /// The local path expected by an update does not exist.
    #[error("'{}' does not exist", .0.display())]
    NotFound(PathBuf),
}

/// Errors that arise while assembling the run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An include or exclude pattern is not a valid regular expression.
    #[error("invalid {kind} pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Which filter the pattern belongs to (`include` or `exclude`).
        kind: &'static str,
        /// The pattern as supplied by the user.
        pattern: String,
        /// Compiler diagnostic from the regex engine.
        message: String,
    },

    /// Static and update modes were both requested.
    #[error("--static and --update cannot be combined")]
    ConflictingModes,

    /// The settings file could not be read.
    #[error("IO error reading settings file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for the expected schema.
    #[error("invalid settings file {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser diagnostic.
        message: String,
    },
}
