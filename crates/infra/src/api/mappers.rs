//! Wire ↔ domain mapping
//!
//! Mapping is strict: a payload missing a required field invalidates the
//! whole value. Pulled entries without an id or without any parseable
//! timestamp are dropped silently.

use chrono::NaiveDateTime;
use eloquia_domain::{JournalEntry, LinkRequest, Patient};

use super::dto::{EntryDto, ErrorResponse, LinkResponse, PatientDto};

const WIRE_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S";

/// Best-effort extraction of the `{"error": string}` payload convention.
pub(crate) fn parse_server_error_message(body: Option<&str>) -> Option<String> {
    let body = body?.trim();
    if body.is_empty() {
        return None;
    }
    serde_json::from_str::<ErrorResponse>(body)
        .ok()?
        .error
        .filter(|message| !message.trim().is_empty())
}

/// Synthesize the server's entry shape from a local record.
///
/// `notes` is the title line, a blank line, then the body content; a blank
/// title contributes nothing. `happenedAt` mirrors the creation timestamp.
pub(crate) fn entry_to_wire(entry: &JournalEntry) -> EntryDto {
    let mut notes = String::new();
    let title = entry.title.trim();
    if !title.is_empty() {
        notes.push_str(title);
        notes.push_str("\n\n");
    }
    notes.push_str(&entry.content);

    EntryDto {
        id: Some(entry.id.clone()),
        notes: Some(notes),
        situation: None,
        tags: Some(entry.tags.clone()),
        happened_at: Some(format_timestamp(entry.created_at)),
        created_at: Some(format_timestamp(entry.created_at)),
        updated_at: Some(format_timestamp(entry.updated_at)),
    }
}

/// Map one pulled record, or drop it.
///
/// Timestamp resolution: created tries `createdAt → happenedAt → updatedAt`;
/// updated tries `updatedAt → createdAt → happenedAt`, falling back to the
/// created timestamp. No id or no parseable created timestamp → `None`.
pub(crate) fn entry_from_wire(dto: &EntryDto) -> Option<JournalEntry> {
    let id = dto.id.clone()?;

    let created_at = first_parseable(&[
        dto.created_at.as_deref(),
        dto.happened_at.as_deref(),
        dto.updated_at.as_deref(),
    ])?;
    let updated_at = first_parseable(&[
        dto.updated_at.as_deref(),
        dto.created_at.as_deref(),
        dto.happened_at.as_deref(),
    ])
    .unwrap_or(created_at);

    Some(JournalEntry {
        id,
        title: dto.situation.clone().unwrap_or_default(),
        content: dto.notes.clone().unwrap_or_default(),
        created_at,
        updated_at,
        tags: dto.tags.clone().unwrap_or_default(),
    })
}

pub(crate) fn patient_from_wire(dto: &PatientDto) -> Option<Patient> {
    let id = dto.id.clone()?;
    let email = dto.email.clone()?;

    Some(Patient {
        id,
        email,
        display_name: dto.display_name.clone(),
        patient_code: dto.patient_code.clone(),
    })
}

pub(crate) fn link_request_from_wire(response: &LinkResponse) -> Option<LinkRequest> {
    let patient = patient_from_wire(response.patient.as_ref()?)?;
    let link = response.link.as_ref()?;
    let link_id = link.id.clone()?;

    Some(LinkRequest { link_id, status: link.status.clone(), patient })
}

fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(WIRE_TIMESTAMP).to_string()
}

fn first_parseable(candidates: &[Option<&str>]) -> Option<NaiveDateTime> {
    candidates.iter().copied().flatten().find_map(parse_timestamp)
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    raw.parse().ok()
}
