//! Common data types used throughout the application

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A journal entry as held in the local cache.
///
/// `id` is immutable after creation; `updated_at` never precedes
/// `created_at`. Timestamps are timezone-naive local datetimes, matching the
/// wire format (`2024-01-01T00:00:00`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Patient identity as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub patient_code: Option<String>,
}

/// A pending or established doctor/patient link request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRequest {
    pub link_id: String,
    pub status: Option<String>,
    pub patient: Patient,
}
