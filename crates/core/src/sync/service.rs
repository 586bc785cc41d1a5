//! Sync reconciler: push local entries, pull authoritative remote state.
//!
//! The protocol is strictly sequential and never interleaved: read the local
//! snapshot, push it in one call, then pull the remote snapshot and apply it
//! to the local cache as a single batch. A push failure aborts the run
//! before the pull is attempted. Remote records always win on pull; there is
//! no merge or conflict detection.
//!
//! Runs are serialized by a single-flight guard: an overlapping `sync_now`
//! call is rejected with a `Failure` instead of queueing.

use std::sync::Arc;

use eloquia_domain::{ApiResult, NetworkError, SyncResult, SyncSummary};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::entries::ports::EntryStore;
use crate::sync::ports::SyncGateway;

/// Returned when a `sync_now` call overlaps a run already in flight.
pub const SYNC_IN_PROGRESS: &str = "Sync already in progress";

/// Sync reconciler between the local entry cache and the remote endpoint pair.
pub struct SyncService {
    local: Arc<dyn EntryStore>,
    gateway: Arc<dyn SyncGateway>,
    in_flight: Mutex<()>,
}

impl SyncService {
    /// Create a new reconciler over the given store and gateway.
    pub fn new(local: Arc<dyn EntryStore>, gateway: Arc<dyn SyncGateway>) -> Self {
        Self { local, gateway, in_flight: Mutex::new(()) }
    }

    /// Run one full push-then-pull cycle.
    ///
    /// Always resolves to a [`SyncResult`]; no partial outcome is ever
    /// reported as success.
    #[instrument(skip(self))]
    pub async fn sync_now(&self) -> SyncResult {
        let Ok(_guard) = self.in_flight.try_lock() else {
            warn!("rejecting overlapping sync invocation");
            return SyncResult::Failure(SYNC_IN_PROGRESS.to_string());
        };

        let local_entries = match self.local.entries().await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "failed to read local snapshot");
                return SyncResult::Failure(err.to_string());
            }
        };

        debug!(count = local_entries.len(), "pushing local snapshot");
        if let ApiResult::Err { error } = self.gateway.push_entries(&local_entries).await {
            warn!(error = %error, "push failed, aborting before pull");
            return SyncResult::Failure(failure_message(&error));
        }

        match self.gateway.pull_entries().await {
            ApiResult::Ok { value: pulled, .. } => {
                let pulled_count = pulled.len();
                if let Err(err) = self.local.upsert_all(&pulled).await {
                    warn!(error = %err, "failed to apply pulled snapshot");
                    return SyncResult::Failure(err.to_string());
                }

                info!(
                    pushed = local_entries.len(),
                    pulled = pulled_count,
                    "sync completed"
                );
                SyncResult::Success(SyncSummary {
                    pushed_entries: local_entries.len(),
                    pulled_entries: pulled_count,
                })
            }
            ApiResult::Err { error } => {
                warn!(error = %error, "pull failed");
                SyncResult::Failure(failure_message(&error))
            }
        }
    }
}

/// Deterministic user-facing reason for each network failure kind.
fn failure_message(error: &NetworkError) -> String {
    match error {
        NetworkError::Http { status, .. } => format!("Sync failed (HTTP {status})"),
        NetworkError::Offline => "You appear to be offline".to_string(),
        NetworkError::Timeout => "Sync timed out".to_string(),
        NetworkError::Decode(_) => "Sync failed (bad response)".to_string(),
        NetworkError::Cancelled => "Sync cancelled".to_string(),
        NetworkError::Unknown => "Sync failed".to_string(),
    }
}
