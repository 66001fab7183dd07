//! Optional TOML settings file.
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Library table shipped with the KiCad footprint libraries.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/KiCad/kicad-library/master/template/fp-lib-table.for-github";

/// Organisation the footprint repositories live under.
pub const DEFAULT_REMOTE_BASE: &str = "https://github.com/KiCad";

/// Default per-request HTTP timeout in seconds.
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Values read from `config.toml`; command-line flags override them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Library table location (URL or local path).
    pub manifest_url: String,
    /// Base URL of the library repositories.
    pub remote_base: String,
    /// Number of libraries processed concurrently.
    pub jobs: usize,
    /// Overall run timeout, if any.
    pub timeout_secs: Option<u64>,
    /// HTTP stall timeout. Bounds the whole library-table request, but for
    /// archive downloads only connecting and waiting for the response head,
    /// so a large archive may stream for longer.
    pub http_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            jobs: 1,
            timeout_secs: None,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Load settings from `path`, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read, or
/// [`ConfigError::Parse`] if it is not valid TOML for [`Settings`].
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.message().to_string(),
    })
}

/// `$XDG_CONFIG_HOME/prettylibs/config.toml`, or `~/.config/prettylibs/config.toml`.
#[must_use]
pub fn default_settings_path() -> Option<PathBuf> {
    settings_path_from(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .ok(),
    )
}

fn settings_path_from(xdg_config: Option<String>, home: Option<String>) -> Option<PathBuf> {
    let base = match (xdg_config, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) => PathBuf::from(home).join(".config"),
        _ => return None,
    };
    Some(base.join("prettylibs").join("config.toml"))
}
