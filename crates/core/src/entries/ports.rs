//! Port interfaces for the local entry cache

use async_trait::async_trait;
use eloquia_domain::{JournalEntry, Result};

/// Trait for the keyed local cache of journal entries
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Read the full entry snapshot.
    async fn entries(&self) -> Result<Vec<JournalEntry>>;

    /// Look up a single entry by id.
    async fn entry(&self, id: &str) -> Result<Option<JournalEntry>>;

    /// Insert or replace an entry, keyed by id.
    async fn upsert(&self, entry: JournalEntry) -> Result<()>;

    /// Insert or replace a batch of entries in one atomic application.
    ///
    /// Implementations must apply the whole batch under a single lock
    /// acquisition so a cancelled caller can never observe a partially
    /// applied batch.
    async fn upsert_all(&self, entries: &[JournalEntry]) -> Result<()>;

    /// Remove an entry by id.
    async fn delete(&self, id: &str) -> Result<()>;
}
