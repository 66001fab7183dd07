//! Drives a run: parse, filter, plan, execute, and collect a [`RunReport`].
//!
//! Filtering and duplicate detection happen in one sequential pass over the
//! manifest so that "first entry wins" is decided in manifest order. The
//! actions themselves then run on up to `jobs` workers; the report is
//! re-assembled in manifest order afterwards.
mod cancel;
mod parallel;
mod report;

pub use cancel::CancelToken;
pub use report::{OutcomeCounts, ReportEntry, RunReport};

use std::collections::HashSet;
use std::sync::Arc;

use crate::actions::{ActionExecutor, ActionOutcome};
use crate::config::RunConfig;
use crate::filter::{self, FilterSpec, SkipReason};
use crate::logging::Log;
use crate::manifest::{self, RepositoryDescriptor};
use crate::operations::FileSystemOps;
use crate::planner::{self, Action, SyncMode};
use crate::transport::{Downloader, Extractor, Vcs};

/// External capabilities handed to the orchestrator.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Clone and pull.
    pub vcs: Arc<dyn Vcs>,
    /// Snapshot download.
    pub downloader: Arc<dyn Downloader>,
    /// Snapshot extraction.
    pub extractor: Arc<dyn Extractor>,
    /// Local filesystem.
    pub fs: Arc<dyn FileSystemOps>,
}

/// Runs the whole pipeline for one invocation.
#[derive(Debug)]
pub struct SyncOrchestrator {
    mode: SyncMode,
    filter: FilterSpec,
    allow_deprecated: bool,
    jobs: usize,
    executor: ActionExecutor,
    cancel: CancelToken,
}

impl SyncOrchestrator {
    /// Build an orchestrator for `config`.
    #[must_use]
    pub fn new(config: &RunConfig, capabilities: Capabilities, cancel: CancelToken) -> Self {
        let executor = ActionExecutor::new(
            config.base_dir.clone(),
            config.remote_base.clone(),
            capabilities.vcs,
            capabilities.downloader,
            capabilities.extractor,
            capabilities.fs,
        );
        Self {
            mode: config.mode,
            filter: config.filter.clone(),
            allow_deprecated: config.allow_deprecated(),
            jobs: config.jobs,
            executor,
            cancel,
        }
    }

    /// Process every entry of `manifest` and report the outcomes in
    /// manifest order.
    ///
    /// Never fails: per-entry errors are recorded in the report.
    pub fn run(&self, manifest: &str, log: &dyn Log) -> RunReport {
        let mut seen = HashSet::new();
        let gated: Vec<(RepositoryDescriptor, Option<SkipReason>)> = manifest::parse(manifest)
            .map(|descriptor| {
                let gate = self.gate(&descriptor, &mut seen);
                (descriptor, gate)
            })
            .collect();
        log.debug(&format!(
            "{} libraries in table, mode {}, {} job(s)",
            gated.len(),
            self.mode,
            self.jobs
        ));

        let entries = parallel::map_ordered(gated, self.jobs, |(library, gate)| {
            let result = self.process(&library, gate, log);
            ReportEntry { library, result }
        });

        let report = RunReport::new(self.mode, entries);
        let interrupted = report.interrupted();
        if interrupted > 0 {
            log.warn(&format!(
                "Interrupted: {interrupted} libraries were not started"
            ));
        }
        report
    }

    /// Decide in manifest order whether an entry is excluded before any
    /// local state is consulted.
    fn gate(
        &self,
        descriptor: &RepositoryDescriptor,
        seen: &mut HashSet<String>,
    ) -> Option<SkipReason> {
        if self.mode == SyncMode::ListOnly {
            return None;
        }
        if let Err(reason) = filter::evaluate(descriptor, &self.filter, self.allow_deprecated) {
            return Some(reason);
        }
        if !seen.insert(descriptor.relative_path().to_string()) {
            return Some(SkipReason::DuplicatePath);
        }
        None
    }

    fn process(
        &self,
        descriptor: &RepositoryDescriptor,
        gate: Option<SkipReason>,
        log: &dyn Log,
    ) -> ActionOutcome {
        let action = match gate {
            Some(reason) => Action::Skip(reason),
            None if self.cancel.is_cancelled() => Action::Skip(SkipReason::Interrupted),
            None if self.mode == SyncMode::ListOnly => Action::List,
            None => planner::plan(self.mode, self.executor.exists_locally(descriptor)),
        };
        let outcome = self.executor.execute(descriptor, action, log);
        announce(descriptor, &outcome, log);
        outcome
    }
}

/// Report an entry's outcome as soon as it is known.
fn announce(descriptor: &RepositoryDescriptor, outcome: &ActionOutcome, log: &dyn Log) {
    let rel = descriptor.relative_path();
    match outcome {
        ActionOutcome::Succeeded => log.info(&format!("{rel} ok")),
        ActionOutcome::Failed(reason) => log.error(&format!("{rel}: {reason}")),
        ActionOutcome::Skipped(SkipReason::ListOnly) => {}
        ActionOutcome::Skipped(SkipReason::DeprecatedExcluded) => {
            log.info(&format!("{} is deprecated - skipping", descriptor.name()));
        }
        ActionOutcome::Skipped(SkipReason::AlreadyExists) => {
            log.info(&format!("{rel} exists, skipping"));
        }
        ActionOutcome::Skipped(SkipReason::DuplicatePath) => {
            log.warn(&format!(
                "{} uses the same path as an earlier library ({rel}), skipping",
                descriptor.name()
            ));
        }
        ActionOutcome::Skipped(reason) => log.debug(&format!("{rel}: skipped ({reason})")),
    }
}
