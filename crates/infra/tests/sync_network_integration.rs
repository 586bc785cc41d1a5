//! Integration tests for the sync reconciler with network scenarios
//!
//! **Purpose**: Test the critical path from local cache → push → pull →
//! local cache update
//!
//! **Coverage:**
//! - Happy path: push snapshot → pull envelope → upsert → Success summary
//! - Push failure: 5xx on push → Failure, pull never attempted
//! - Pull mapping: records without an id are dropped, uncounted
//! - Offline: unreachable host → deterministic failure message
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the journaling backend)
//! - Real NetworkClient + EntriesSyncApi + MemoryEntryStore

use std::sync::Arc;

use eloquia_core::{EntryStore, SyncService};
use eloquia_domain::{JournalEntry, SyncResult, SyncSummary};
use eloquia_infra::api::EntriesSyncApi;
use eloquia_infra::entries::MemoryEntryStore;
use eloquia_infra::http::NetworkClient;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_entry(id: &str, tags: &[&str]) -> JournalEntry {
    JournalEntry {
        id: id.to_string(),
        title: "Title".to_string(),
        content: "Body".to_string(),
        created_at: "2024-01-01T00:00:00".parse().unwrap(),
        updated_at: "2024-01-01T00:00:00".parse().unwrap(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}

fn service_for(server_url: &str, store: Arc<MemoryEntryStore>) -> SyncService {
    let client = Arc::new(NetworkClient::builder(server_url).build().unwrap());
    let gateway = Arc::new(EntriesSyncApi::new(client));
    SyncService::new(store, gateway)
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_success_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/entries/sync"))
        .and(body_partial_json(serde_json::json!({
            "entries": [{ "id": "a", "notes": "Title\n\nBody", "tags": ["x"] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patient/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entries": [{
                "id": "a",
                "notes": "Title\n\nBody",
                "tags": ["x", "y"],
                "createdAt": "2024-01-01T00:00:00",
            }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryEntryStore::with_entries(vec![local_entry("a", &["x"])]));
    let service = service_for(&mock_server.uri(), store.clone());

    let result = service.sync_now().await;

    assert_eq!(
        result,
        SyncResult::Success(SyncSummary { pushed_entries: 1, pulled_entries: 1 })
    );

    // Remote wins: the local record now carries the pulled tag set.
    let entries = store.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, "a");
    assert_eq!(entries[0].tags, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(entries[0].content, "Title\n\nBody");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_failure_aborts_before_pull() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/entries/sync"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    // The pull endpoint must never be hit.
    Mock::given(method("GET"))
        .and(path("/patient/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entries": []
        })))
        .expect(0)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryEntryStore::with_entries(vec![local_entry("a", &[])]));
    let service = service_for(&mock_server.uri(), store.clone());

    let result = service.sync_now().await;

    assert_eq!(result, SyncResult::Failure("Sync failed (HTTP 500)".to_string()));

    // Local state is untouched on failure.
    let entries = store.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].tags, Vec::<String>::new());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_pull_drops_records_without_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/entries/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patient/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entries": [
                { "id": "a", "notes": "kept", "createdAt": "2024-01-01T00:00:00" },
                { "notes": "dropped", "createdAt": "2024-01-01T00:00:00" },
            ]
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryEntryStore::new());
    let service = service_for(&mock_server.uri(), store.clone());

    let result = service.sync_now().await;

    assert_eq!(
        result,
        SyncResult::Success(SyncSummary { pushed_entries: 0, pulled_entries: 1 })
    );
    assert_eq!(store.entries().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_pull_is_idempotent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/patient/entries/sync"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/patient/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "entries": [
                { "id": "a", "notes": "one", "createdAt": "2024-01-01T00:00:00" },
                { "id": "b", "notes": "two", "createdAt": "2024-01-02T00:00:00" },
            ]
        })))
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemoryEntryStore::new());
    let service = service_for(&mock_server.uri(), store.clone());

    assert!(service.sync_now().await.is_success());
    let first = store.entries().await.unwrap();

    assert!(service.sync_now().await.is_success());
    let second = store.entries().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_offline_failure_message() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener); // release the port so requests fail with ECONNREFUSED

    let store = Arc::new(MemoryEntryStore::new());
    let service = service_for(&format!("http://{addr}"), store);

    let result = service.sync_now().await;

    assert_eq!(result, SyncResult::Failure("You appear to be offline".to_string()));
}
