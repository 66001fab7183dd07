//! The sync command: resolve configuration, fetch the library table, and
//! process every library in it.
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::{self, RunConfig, Settings};
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::manifest;
use crate::operations::SystemFileSystemOps;
use crate::planner::SyncMode;
use crate::sync::{Capabilities, CancelToken, RunReport, SyncOrchestrator};
use crate::transport::{self, GitCli, HttpClient, ZipExtractor};

/// Run the sync command with production capabilities.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the library table
/// cannot be retrieved, or the report file cannot be written. Failures of
/// individual libraries are reported but do not fail the command.
pub fn run(cli: &Cli, log: &Logger, cancel: CancelToken) -> Result<()> {
    log.info(&format!("prettylibs {}", crate::VERSION));
    let config = load_run_config(cli)?;

    if let Some(path) = &cli.path
        && !path.is_dir()
    {
        log.warn(&format!(
            "{} is not a directory, using {}",
            path.display(),
            config.base_dir.display()
        ));
    }

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let git = GitCli::new(executor);
    if matches!(config.mode, SyncMode::CloneNew | SyncMode::Update) && !git.is_available() {
        log.warn("git not found on PATH; clone and update will fail");
    }

    let capabilities = Capabilities {
        vcs: Arc::new(git),
        downloader: Arc::new(HttpClient::new(config.http_timeout)),
        extractor: Arc::new(ZipExtractor),
        fs: Arc::new(SystemFileSystemOps),
    };
    let cancel = match config.timeout {
        Some(timeout) => cancel.with_timeout(timeout),
        None => cancel,
    };

    execute(&config, capabilities, cancel, log)?;

    if let Some(path) = log.log_path() {
        log.debug(&format!("log written to {}", path.display()));
    }
    Ok(())
}

/// Combine built-in defaults, the settings file, and `cli` into a
/// [`RunConfig`].
///
/// # Errors
///
/// Returns an error if an explicitly requested settings file is missing or
/// invalid, or the flags do not form a valid configuration.
pub fn load_run_config(cli: &Cli) -> Result<RunConfig> {
    let settings = match &cli.config {
        Some(path) => {
            anyhow::ensure!(
                path.exists(),
                "settings file {} does not exist",
                path.display()
            );
            config::load_settings(path)?
        }
        None => match config::default_settings_path() {
            Some(path) => config::load_settings(&path)?,
            None => Settings::default(),
        },
    };
    let cwd = std::env::current_dir().context("cannot determine the current directory")?;
    Ok(RunConfig::resolve(cli, settings, &cwd)?)
}

/// Fetch the library table and synchronize every entry in it.
///
/// # Errors
///
/// Returns an error if the library table cannot be retrieved or decoded, or
/// the report file cannot be written. Nothing is processed in the first case.
pub fn execute(
    config: &RunConfig,
    capabilities: Capabilities,
    cancel: CancelToken,
    log: &dyn Log,
) -> Result<RunReport> {
    log.stage("Downloading library table");
    log.debug(&format!("table: {}", config.manifest));
    let bytes = transport::fetch_manifest(&config.manifest, capabilities.downloader.as_ref())?;
    let text = manifest::decode(&bytes)?;

    log.stage(&format!("Processing libraries into {}", config.base_dir.display()));
    let report = SyncOrchestrator::new(config, capabilities, cancel).run(text, log);

    log.stage("Summary");
    log.info(&report.summary_line());
    if let Some(path) = &config.report_path {
        write_report(&report, path)?;
        log.info(&format!("report written to {}", path.display()));
    }
    log.info("Done");
    Ok(report)
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = report.to_json().context("serializing run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("writing run report to {}", path.display()))
}
