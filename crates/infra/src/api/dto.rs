//! Wire DTOs for the backend API
//!
//! Every field the server may omit is optional here; strict validation
//! happens in the mappers, never by defaulting a required field.

use serde::{Deserialize, Serialize};

/// Journal entry as the sync endpoints exchange it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub situation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub happened_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Push-sync request body.
#[derive(Debug, Clone, Serialize)]
pub struct EntriesSyncRequest {
    pub entries: Vec<EntryDto>,
}

/// Pull-sync response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EntriesResponse {
    #[serde(default)]
    pub entries: Option<Vec<EntryDto>>,
}

/// Generic acknowledgement body.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

/// Error payload convention: `{"error": string}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkInviteRequest {
    pub patient_code: String,
    pub patient_email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairingCodeRedeemRequest {
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub patient_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Response shared by the link and account endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkResponse {
    #[serde(default)]
    pub patient: Option<PatientDto>,
    #[serde(default)]
    pub link: Option<LinkDto>,
}

/// Response of `GET /patient/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientMeResponse {
    #[serde(default)]
    pub patient: Option<PatientDto>,
}
