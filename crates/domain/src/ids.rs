//! Entry id generation

use uuid::Uuid;

/// Generate an id for a locally created journal entry.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}
