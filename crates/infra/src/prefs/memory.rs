//! In-memory preference store

use std::collections::HashMap;

use eloquia_core::KeyValueStore;
use parking_lot::RwLock;
use serde_json::Value;

/// Process-local [`KeyValueStore`]. Values do not survive a restart; useful
/// for tests and for platforms without durable preferences.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<HashMap<String, Value>>,
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values.read().get(key).and_then(|value| value.as_str().map(str::to_owned))
    }

    fn put_string(&self, key: &str, value: &str) {
        self.values.write().insert(key.to_string(), Value::String(value.to_string()));
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.values.read().get(key).and_then(Value::as_bool).unwrap_or(default)
    }

    fn put_bool(&self, key: &str, value: bool) {
        self.values.write().insert(key.to_string(), Value::Bool(value));
    }

    fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}
