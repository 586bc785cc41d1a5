//! Port interfaces for sync operations

use async_trait::async_trait;
use eloquia_domain::{ApiResult, JournalEntry};

/// Trait for the remote sync endpoint pair.
///
/// Implementations own the wire representation: pushing synthesizes the
/// server's entry shape from domain records, and pulling maps the remote
/// envelope back, dropping records that lack an id or a parseable timestamp.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    /// Push the full local snapshot to the remote in one call.
    async fn push_entries(&self, entries: &[JournalEntry]) -> ApiResult<()>;

    /// Pull the remote's full entry snapshot.
    async fn pull_entries(&self) -> ApiResult<Vec<JournalEntry>>;
}
