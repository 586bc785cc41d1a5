//! Sync outcome types

use serde::{Deserialize, Serialize};

/// Counters reported by a completed sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSummary {
    pub pushed_entries: usize,
    pub pulled_entries: usize,
}

/// Outcome of a `sync_now` invocation.
///
/// Sync never raises: every run resolves to `Success` with its summary or
/// `Failure` with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncResult {
    Success(SyncSummary),
    Failure(String),
}

impl SyncResult {
    /// `true` when the run completed both push and pull.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}
