//! Command-line surface.
use std::path::PathBuf;

use clap::Parser;

/// Download KiCad footprint libraries and keep them up to date.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "prettylibs", version = crate::VERSION)]
pub struct Cli {
    /// Directory to download libraries into (current directory if unspecified
    /// or not an existing directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Only libraries whose name matches this pattern (case-insensitive regex)
    #[arg(short, long, value_name = "PATTERN")]
    pub lib: Option<String>,

    /// Skip libraries whose name matches this pattern (case-insensitive regex)
    #[arg(short, long, value_name = "PATTERN")]
    pub ignore: Option<String>,

    /// Download static snapshots of each library (no version control)
    #[arg(short = 's', long = "static", conflicts_with = "update")]
    pub static_copy: bool,

    /// Include libraries marked as deprecated
    #[arg(short, long)]
    pub deprecated: bool,

    /// Update previously cloned libraries (no new libraries are downloaded)
    #[arg(short, long)]
    pub update: bool,

    /// Test run: list libraries without downloading anything
    #[arg(short, long)]
    pub test: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of libraries processed concurrently
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Stop starting new libraries after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Library table to read (URL or local file)
    #[arg(long, value_name = "URL_OR_PATH")]
    pub manifest: Option<String>,

    /// Base URL the library repositories live under
    #[arg(long, value_name = "URL")]
    pub remote: Option<String>,

    /// Settings file (defaults to `$XDG_CONFIG_HOME/prettylibs/config.toml`)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}
