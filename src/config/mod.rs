//! Run configuration: built-in defaults, the optional settings file, then
//! command-line flags, resolved once into an immutable [`RunConfig`].
mod settings;

pub use settings::{
    DEFAULT_MANIFEST_URL, DEFAULT_REMOTE_BASE, Settings, default_settings_path, load_settings,
};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::filter::FilterSpec;
use crate::planner::SyncMode;

/// Everything a run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory libraries are written into.
    pub base_dir: PathBuf,
    /// Include/exclude/deprecation rules.
    pub filter: FilterSpec,
    /// Synchronization mode.
    pub mode: SyncMode,
    /// Worker count (at least 1).
    pub jobs: usize,
    /// Base URL of the library repositories.
    pub remote_base: String,
    /// Library table location (URL or local path).
    pub manifest: String,
    /// Overall deadline for starting new actions.
    pub timeout: Option<Duration>,
    /// Per-request HTTP timeout.
    pub http_timeout: Duration,
    /// Where to write the JSON run report.
    pub report_path: Option<PathBuf>,
}

impl RunConfig {
    /// Merge `settings` with the flags in `cli`; flags win.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConflictingModes`] if both static and update
    /// modes are requested outside a test run, or
    /// [`ConfigError::InvalidPattern`] if a filter pattern does not compile.
    pub fn resolve(cli: &Cli, settings: Settings, cwd: &Path) -> Result<Self, ConfigError> {
        if cli.static_copy && cli.update && !cli.test {
            return Err(ConfigError::ConflictingModes);
        }
        let filter = FilterSpec::new(cli.lib.as_deref(), cli.ignore.as_deref(), cli.deprecated)?;
        Ok(Self {
            base_dir: resolve_base_dir(cli.path.as_deref(), cwd),
            filter,
            mode: SyncMode::from_flags(cli.test, cli.static_copy, cli.update),
            jobs: cli.jobs.unwrap_or(settings.jobs).max(1),
            remote_base: cli
                .remote
                .clone()
                .unwrap_or(settings.remote_base)
                .trim_end_matches('/')
                .to_string(),
            manifest: cli.manifest.clone().unwrap_or(settings.manifest_url),
            timeout: cli
                .timeout
                .or(settings.timeout_secs)
                .map(Duration::from_secs),
            http_timeout: Duration::from_secs(settings.http_timeout_secs),
            report_path: cli.report.clone(),
        })
    }

    /// Whether deprecated libraries are in scope.
    #[must_use]
    pub const fn allow_deprecated(&self) -> bool {
        self.filter.include_deprecated()
    }
}

/// `requested` if it names an existing directory, otherwise `cwd`.
#[must_use]
pub fn resolve_base_dir(requested: Option<&Path>, cwd: &Path) -> PathBuf {
    match requested {
        Some(path) if path.is_dir() => {
            dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => cwd.to_path_buf(),
    }
}
