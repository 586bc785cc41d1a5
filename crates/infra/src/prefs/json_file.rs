//! File-backed preference store
//!
//! All preferences live in one JSON document that is rewritten in full on
//! every mutation. The interface is infallible: unreadable files are
//! discarded with a warning and write failures are logged, never propagated.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use eloquia_core::KeyValueStore;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::warn;

/// Durable [`KeyValueStore`] backed by a single JSON file.
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<HashMap<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing document. A missing or
    /// unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(path = %path.display(), error = %err, "discarding unreadable preferences file");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Self { path, values: RwLock::new(values) }
    }

    fn flush(&self, values: &HashMap<String, Value>) {
        let encoded = match serde_json::to_string_pretty(values) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!(error = %err, "failed to encode preferences");
                return;
            }
        };

        if let Some(parent) = self.path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                warn!(path = %self.path.display(), error = %err, "failed to create preferences directory");
                return;
            }
        }

        if let Err(err) = fs::write(&self.path, encoded) {
            warn!(path = %self.path.display(), error = %err, "failed to write preferences file");
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().get(key).and_then(|value| value.as_str().map(str::to_owned))
    }

    fn put_string(&self, key: &str, value: &str) {
        let mut values = self.values.write();
        values.insert(key.to_string(), Value::String(value.to_string()));
        self.flush(&values);
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.read().get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn put_bool(&self, key: &str, value: bool) {
        let mut values = self.values.write();
        values.insert(key.to_string(), Value::Bool(value));
        self.flush(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self.values.write();
        values.remove(key);
        self.flush(&values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = JsonFileStore::open(&path);
        store.put_string("name", "ada");
        store.put_bool("flag", true);
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert_eq!(reopened.get_string("name").as_deref(), Some("ada"));
        assert!(reopened.get_bool("flag", false));
    }

    #[test]
    fn test_remove_is_durable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let store = JsonFileStore::open(&path);
        store.put_string("name", "ada");
        store.remove("name");
        drop(store);

        let reopened = JsonFileStore::open(&path);
        assert!(reopened.get_string("name").is_none());
    }

    #[test]
    fn test_corrupt_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::open(&path);
        assert!(store.get_string("anything").is_none());
    }
}
