//! Per-entry action selection.
use serde::Serialize;

use crate::filter::SkipReason;

/// What kind of synchronization the whole run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Clone every missing library with version control.
    CloneNew,
    /// Download a snapshot archive of every missing library.
    StaticFetch,
    /// Pull every selected library that was cloned earlier.
    Update,
    /// Only list what the manifest offers.
    ListOnly,
}

impl SyncMode {
    /// Select the mode from the run flags.
    ///
    /// Listing wins over everything else; static and update are expected to
    /// be mutually exclusive and are checked by the caller.
    #[must_use]
    pub const fn from_flags(list_only: bool, static_fetch: bool, update: bool) -> Self {
        if list_only {
            Self::ListOnly
        } else if update {
            Self::Update
        } else if static_fetch {
            Self::StaticFetch
        } else {
            Self::CloneNew
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::CloneNew => "clone",
            Self::StaticFetch => "static",
            Self::Update => "update",
            Self::ListOnly => "list",
        })
    }
}

/// The step chosen for one in-scope entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Report the entry name only.
    List,
    /// Do nothing.
    Skip(SkipReason),
    /// Clone from the remote.
    Clone,
    /// Download and unpack a snapshot.
    StaticFetch,
    /// Pull into the existing copy.
    Update,
}

/// Choose the action for an entry.
///
/// Creating actions never clobber an existing path. Updates are planned
/// unconditionally; a missing target is reported by the executor as a
/// failure rather than skipped here.
#[must_use]
pub const fn plan(mode: SyncMode, exists_locally: bool) -> Action {
    match mode {
        SyncMode::ListOnly => Action::List,
        SyncMode::Update => Action::Update,
        SyncMode::CloneNew | SyncMode::StaticFetch if exists_locally => {
            Action::Skip(SkipReason::AlreadyExists)
        }
        SyncMode::CloneNew => Action::Clone,
        SyncMode::StaticFetch => Action::StaticFetch,
    }
}
