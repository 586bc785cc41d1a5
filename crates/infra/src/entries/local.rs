//! In-memory entry cache

use async_trait::async_trait;
use eloquia_core::EntryStore;
use eloquia_domain::{JournalEntry, Result};
use parking_lot::RwLock;

/// Process-local [`EntryStore`], newest first.
#[derive(Default)]
pub struct MemoryEntryStore {
    entries: RwLock<Vec<JournalEntry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an initial snapshot.
    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        Self { entries: RwLock::new(entries) }
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn entries(&self) -> Result<Vec<JournalEntry>> {
        Ok(self.entries.read().clone())
    }

    async fn entry(&self, id: &str) -> Result<Option<JournalEntry>> {
        Ok(self.entries.read().iter().find(|entry| entry.id == id).cloned())
    }

    async fn upsert(&self, entry: JournalEntry) -> Result<()> {
        let mut entries = self.entries.write();
        entries.retain(|existing| existing.id != entry.id);
        entries.insert(0, entry);
        Ok(())
    }

    async fn upsert_all(&self, batch: &[JournalEntry]) -> Result<()> {
        // One write-lock acquisition for the whole batch.
        let mut entries = self.entries.write();
        for entry in batch {
            entries.retain(|existing| existing.id != entry.id);
            entries.insert(0, entry.clone());
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.entries.write().retain(|existing| existing.id != id);
        Ok(())
    }
}
