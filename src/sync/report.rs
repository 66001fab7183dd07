//! The ordered record of outcomes for one run.
use serde::Serialize;

use crate::actions::ActionOutcome;
use crate::filter::SkipReason;
use crate::manifest::RepositoryDescriptor;
use crate::planner::SyncMode;

/// One processed manifest entry.
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// The entry as parsed from the manifest.
    pub library: RepositoryDescriptor,
    /// What happened to it.
    pub result: ActionOutcome,
}

/// Totals per outcome kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    /// Entries whose action completed.
    pub succeeded: usize,
    /// Entries whose action failed.
    pub failed: usize,
    /// Entries skipped for any reason other than listing.
    pub skipped: usize,
    /// Entries only listed.
    pub listed: usize,
}

/// Outcomes of one invocation, in manifest order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    mode: SyncMode,
    entries: Vec<ReportEntry>,
    counts: OutcomeCounts,
}

impl RunReport {
    /// Build a report from entries already in manifest order.
    #[must_use]
    pub fn new(mode: SyncMode, entries: Vec<ReportEntry>) -> Self {
        let mut counts = OutcomeCounts::default();
        for entry in &entries {
            match entry.result {
                ActionOutcome::Succeeded => counts.succeeded += 1,
                ActionOutcome::Failed(_) => counts.failed += 1,
                ActionOutcome::Skipped(SkipReason::ListOnly) => counts.listed += 1,
                ActionOutcome::Skipped(_) => counts.skipped += 1,
            }
        }
        Self {
            mode,
            entries,
            counts,
        }
    }

    /// Mode the run was performed in.
    #[must_use]
    pub const fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Every entry in manifest order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Outcome totals.
    #[must_use]
    pub const fn counts(&self) -> OutcomeCounts {
        self.counts
    }

    /// Number of entries that never started because the run was cancelled.
    #[must_use]
    pub fn interrupted(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.result == ActionOutcome::Skipped(SkipReason::Interrupted))
            .count()
    }

    /// One-line summary printed at the end of a run.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let c = self.counts;
        format!(
            "{} entries: {} succeeded, {} failed, {} skipped, {} listed",
            self.entries.len(),
            c.succeeded,
            c.failed,
            c.skipped,
            c.listed
        )
    }

    /// Pretty-printed JSON rendering for `--report`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
