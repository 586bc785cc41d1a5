//! Entry sync endpoints
//!
//! Thin HTTP wrapper for the push/pull pair plus the [`SyncGateway`]
//! implementation the reconciler drives. Wire mapping lives here so the
//! core never sees the server's entry shape.

use std::sync::Arc;

use async_trait::async_trait;
use eloquia_core::SyncGateway;
use eloquia_domain::{ApiResult, JournalEntry};
use tracing::debug;

use super::dto::{EntriesResponse, EntriesSyncRequest, EntryDto, StatusResponse};
use super::mappers::{entry_from_wire, entry_to_wire};
use crate::http::NetworkClient;

/// HTTP access to the entry sync endpoint pair.
pub struct EntriesSyncApi {
    client: Arc<NetworkClient>,
}

impl EntriesSyncApi {
    pub fn new(client: Arc<NetworkClient>) -> Self {
        Self { client }
    }

    /// `GET /patient/entries` — the remote's full entry snapshot.
    pub async fn pull(&self) -> ApiResult<EntriesResponse> {
        self.client.get("/patient/entries").await
    }

    /// `POST /patient/entries/sync` — push the full local snapshot.
    pub async fn push(&self, entries: Vec<EntryDto>) -> ApiResult<StatusResponse> {
        self.client.post("/patient/entries/sync", &EntriesSyncRequest { entries }).await
    }
}

#[async_trait]
impl SyncGateway for EntriesSyncApi {
    async fn push_entries(&self, entries: &[JournalEntry]) -> ApiResult<()> {
        let wire: Vec<EntryDto> = entries.iter().map(entry_to_wire).collect();
        debug!(count = wire.len(), "pushing entries");
        self.push(wire).await.map(|_| ())
    }

    async fn pull_entries(&self) -> ApiResult<Vec<JournalEntry>> {
        self.pull().await.map(|envelope| {
            let records = envelope.entries.unwrap_or_default();
            let total = records.len();
            let mapped: Vec<JournalEntry> =
                records.iter().filter_map(entry_from_wire).collect();
            if mapped.len() < total {
                // Records without an id or timestamp are dropped, uncounted.
                debug!(dropped = total - mapped.len(), "discarded unmappable pulled records");
            }
            mapped
        })
    }
}
