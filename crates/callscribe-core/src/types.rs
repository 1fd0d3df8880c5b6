//! Shared domain types for the Callscribe toolkit
//!
//! Field names and casing follow the backend wire contract, including its
//! mixed-style fields (`totalAudios` next to `start_date`), so everything
//! here serializes straight onto the REST surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Lifecycle state of an audio list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    /// Created but not yet filled with audios
    #[default]
    Draft,
    /// Audios were generated from a ticket search
    Generated,
    /// Contents reviewed and saved by an operator
    Saved,
    /// Visible to transcribers
    Published,
}

impl ListStatus {
    /// String form used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generated => "generated",
            Self::Saved => "saved",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for ListStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Publication state of a single audio item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioStatus {
    /// Imported but not yet released to transcribers
    #[default]
    Draft,
    /// Released to transcribers
    Published,
}

impl AudioStatus {
    /// String form used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for AudioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Access role of a dashboard account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Transcription access only
    #[default]
    User,
}

impl Role {
    /// String form used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dashboard account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Access role
    #[serde(default)]
    pub role: Role,
    /// Account creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Whether the account has administrative access
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Identity of whoever produced a human transcription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcriber {
    /// Backend identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
}

/// One call recording inside an audio list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioItem {
    /// Backend identifier, absent on previews that are not persisted yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Owning list identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_id: Option<i64>,
    /// Display title, usually the call correlation key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Recording URL
    pub url: String,
    /// Identifier of the ticket this recording came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    /// Call correlation key shared with the ticketing system
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedid: Option<String>,
    /// Call duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Publication state
    #[serde(default)]
    pub status: AudioStatus,
    /// Operator supplied transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_human: Option<String>,
    /// Machine generated transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_ai: Option<String>,
    /// Normalized tags attached during transcription
    #[serde(default)]
    pub tags: Vec<String>,
    /// Who produced the human transcription
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcriber: Option<Transcriber>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn has_text(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

impl AudioItem {
    /// Whether an operator transcription is present after trimming
    #[must_use]
    pub fn has_human_transcript(&self) -> bool {
        has_text(self.transcript_human.as_deref())
    }

    /// Whether a machine transcription is present after trimming
    #[must_use]
    pub fn has_ai_transcript(&self) -> bool {
        has_text(self.transcript_ai.as_deref())
    }

    /// Whether any transcription text is present after trimming
    #[must_use]
    pub fn is_transcribed(&self) -> bool {
        self.has_human_transcript() || self.has_ai_transcript()
    }
}

/// A batch of call recordings scoped to an account and a datetime window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioList {
    /// Backend identifier
    pub id: i64,
    /// Account the recordings belong to
    pub accountcode: String,
    /// Optional site scoping within the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condominium_id: Option<String>,
    /// Inclusive window start, `YYYY-MM-DDTHH:MM:SS`
    pub start_date: String,
    /// Inclusive window end, always after `start_date`
    pub end_date: String,
    /// Lifecycle state
    #[serde(default)]
    pub status: ListStatus,
    /// Free-form operator notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Account that created the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Server computed audio count
    #[serde(default, rename = "totalAudios", skip_serializing_if = "Option::is_none")]
    pub total_audios: Option<i64>,
    /// Server computed duration sum in seconds
    #[serde(default, rename = "totalDuration", skip_serializing_if = "Option::is_none")]
    pub total_duration: Option<i64>,
    /// Audio items in insertion order, empty on collection endpoints
    #[serde(default)]
    pub audios: Vec<AudioItem>,
}

/// One answered-call ticket returned by the external ticketing service
///
/// Ephemeral: rows exist only while an operator picks audios to import and
/// are never persisted locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    /// Ticketing-system identifier
    pub id: String,
    /// Call correlation key shared with the recording store
    pub linkedid: String,
    /// Call duration in seconds
    pub duration: i64,
    /// Whether a recording is downloadable over https
    pub has_audio: bool,
    /// Recording URL, present only when `has_audio`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audiorecord: Option<String>,
}

/// Pagination block describing one page of a server-side collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page, 1-based
    pub page: u32,
    /// Page size requested
    pub limit: u32,
    /// Total rows across all pages
    pub total: u64,
    /// Total pages for the current limit
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl Pagination {
    /// Zeroed block used after a reset or a failed search
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 0,
        }
    }

    /// Whether a later page exists
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a page number falls inside the known range
    #[must_use]
    pub const fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::empty()
    }
}

/// Payload for creating one audio list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListRequest {
    /// Account the recordings belong to
    #[validate(length(min = 2, max = 50, message = "must be 2 to 50 characters"))]
    pub accountcode: String,
    /// Optional site scoping within the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condominium_id: Option<String>,
    /// Inclusive window start, `YYYY-MM-DDTHH:MM:SS`
    pub start_date: String,
    /// Inclusive window end
    pub end_date: String,
    /// Free-form operator notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub notes: Option<String>,
    /// Account creating the list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<i64>,
}

impl CreateListRequest {
    /// Validate field constraints and the datetime window
    ///
    /// # Errors
    ///
    /// Returns a field-level validation error for the first violated rule.
    /// Runs entirely before any network traffic.
    pub fn validate_fields(&self) -> crate::Result<()> {
        self.validate().map_err(|e| first_validation_error(&e))?;
        crate::timefmt::validate_window(&self.start_date, &self.end_date)
    }
}

/// Partial update for an audio list
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateList {
    /// New lifecycle state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ListStatus>,
    /// Replacement notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Replacement window start
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Replacement window end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Map validator output to the first field-level error
fn first_validation_error(errors: &validator::ValidationErrors) -> crate::Error {
    errors
        .field_errors()
        .iter()
        .next()
        .and_then(|(field, field_errors)| {
            field_errors.first().map(|err| {
                let message = err.message.as_ref().map_or_else(
                    || format!("invalid value for {field}"),
                    std::string::ToString::to_string,
                );
                crate::Error::validation(field.to_string(), message)
            })
        })
        .unwrap_or_else(|| crate::Error::validation("request", "invalid request"))
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn audio(human: Option<&str>, ai: Option<&str>) -> AudioItem {
        AudioItem {
            id: Some(1),
            list_id: Some(10),
            title: Some("1724577600.123".to_string()),
            url: "https://recordings.example.com/1724577600.123.mp3".to_string(),
            external_id: Some("9001".to_string()),
            linkedid: Some("1724577600.123".to_string()),
            duration: Some(185),
            status: AudioStatus::Draft,
            transcript_human: human.map(ToString::to_string),
            transcript_ai: ai.map(ToString::to_string),
            tags: Vec::new(),
            transcriber: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_list_status_display_matches_wire_form() {
        assert_eq!(ListStatus::Draft.to_string(), "draft");
        assert_eq!(ListStatus::Generated.to_string(), "generated");
        assert_eq!(ListStatus::Saved.to_string(), "saved");
        assert_eq!(ListStatus::Published.to_string(), "published");
    }

    #[test]
    fn test_list_status_default_is_draft() {
        assert_eq!(ListStatus::default(), ListStatus::Draft);
    }

    #[test]
    fn test_list_status_serde() {
        let json = serde_json::to_string(&ListStatus::Generated).unwrap();
        assert_eq!(json, "\"generated\"");
        let back: ListStatus = serde_json::from_str("\"published\"").unwrap();
        assert_eq!(back, ListStatus::Published);
    }

    #[test]
    fn test_audio_status_serde() {
        assert_eq!(AudioStatus::Draft.as_str(), "draft");
        let back: AudioStatus = serde_json::from_str("\"published\"").unwrap();
        assert_eq!(back, AudioStatus::Published);
    }

    #[test]
    fn test_role_check() {
        let admin = User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            role: Role::Admin,
            created_at: None,
        };
        let user = User {
            role: Role::User,
            ..admin.clone()
        };

        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_is_transcribed_requires_non_blank_text() {
        assert!(!audio(None, None).is_transcribed());
        assert!(!audio(Some(""), None).is_transcribed());
        assert!(!audio(Some("   "), Some("\t\n")).is_transcribed());
        assert!(audio(Some("alô, bom dia"), None).is_transcribed());
        assert!(audio(None, Some("alô, bom dia")).is_transcribed());
        assert!(audio(Some("a"), Some("b")).is_transcribed());
    }

    #[test]
    fn test_transcript_kind_helpers() {
        let item = audio(Some("texto"), None);
        assert!(item.has_human_transcript());
        assert!(!item.has_ai_transcript());
    }

    #[test]
    fn test_audio_item_deserializes_sparse_json() {
        let json = r#"{"url": "https://recordings.example.com/a.mp3"}"#;
        let item: AudioItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, None);
        assert_eq!(item.status, AudioStatus::Draft);
        assert!(item.tags.is_empty());
        assert!(!item.is_transcribed());
    }

    #[test]
    fn test_audio_list_total_fields_use_camel_case() {
        let json = r#"{
            "id": 7,
            "accountcode": "4002",
            "start_date": "2025-08-25T00:00:00",
            "end_date": "2025-08-25T23:59:59",
            "status": "generated",
            "totalAudios": 12,
            "totalDuration": 3600
        }"#;
        let list: AudioList = serde_json::from_str(json).unwrap();

        assert_eq!(list.total_audios, Some(12));
        assert_eq!(list.total_duration, Some(3600));
        assert!(list.audios.is_empty());

        let out = serde_json::to_value(&list).unwrap();
        assert_eq!(out["totalAudios"], 12);
        assert!(out.get("total_audios").is_none());
    }

    #[test]
    fn test_audio_list_preserves_audio_order() {
        let json = r#"{
            "id": 7,
            "accountcode": "4002",
            "start_date": "2025-08-25T00:00:00",
            "end_date": "2025-08-25T23:59:59",
            "audios": [
                {"id": 3, "url": "https://r.example.com/3.mp3"},
                {"id": 1, "url": "https://r.example.com/1.mp3"},
                {"id": 2, "url": "https://r.example.com/2.mp3"}
            ]
        }"#;
        let list: AudioList = serde_json::from_str(json).unwrap();

        let ids: Vec<Option<i64>> = list.audios.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_ticket_record_omits_absent_audiorecord() {
        let ticket = TicketRecord {
            id: "881".to_string(),
            linkedid: "1724577600.45".to_string(),
            duration: 120,
            has_audio: false,
            audiorecord: None,
        };

        let json = serde_json::to_string(&ticket).unwrap();
        assert!(!json.contains("audiorecord"));
    }

    #[test]
    fn test_pagination_empty_block() {
        let p = Pagination::empty();

        assert_eq!(p.page, 1);
        assert_eq!(p.limit, 10);
        assert_eq!(p.total, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next());
        assert!(!p.has_prev());
    }

    #[test]
    fn test_pagination_navigation() {
        let p = Pagination {
            page: 2,
            limit: 10,
            total: 45,
            total_pages: 5,
        };

        assert!(p.has_next());
        assert!(p.has_prev());
        assert!(p.contains_page(1));
        assert!(p.contains_page(5));
        assert!(!p.contains_page(0));
        assert!(!p.contains_page(6));
    }

    #[test]
    fn test_pagination_last_page_has_no_next() {
        let p = Pagination {
            page: 5,
            limit: 10,
            total: 45,
            total_pages: 5,
        };

        assert!(!p.has_next());
        assert!(p.has_prev());
    }

    #[test]
    fn test_pagination_total_pages_rename() {
        let p = Pagination {
            page: 1,
            limit: 10,
            total: 3,
            total_pages: 1,
        };
        let json = serde_json::to_value(p).unwrap();

        assert_eq!(json["totalPages"], 1);
        assert!(json.get("total_pages").is_none());
    }

    fn valid_request() -> CreateListRequest {
        CreateListRequest {
            accountcode: "4002".to_string(),
            condominium_id: None,
            start_date: "2025-08-25T00:00:00".to_string(),
            end_date: "2025-08-25T23:59:59".to_string(),
            notes: None,
            created_by: Some(1),
        }
    }

    #[test]
    fn test_create_list_request_valid() {
        assert!(valid_request().validate_fields().is_ok());
    }

    #[test]
    fn test_create_list_request_rejects_short_accountcode() {
        let req = CreateListRequest {
            accountcode: "4".to_string(),
            ..valid_request()
        };

        let err = req.validate_fields().unwrap_err();
        assert_eq!(err.field(), Some("accountcode"));
    }

    #[test]
    fn test_create_list_request_rejects_long_notes() {
        let req = CreateListRequest {
            notes: Some("x".repeat(501)),
            ..valid_request()
        };

        let err = req.validate_fields().unwrap_err();
        assert_eq!(err.field(), Some("notes"));
    }

    #[test]
    fn test_create_list_request_rejects_inverted_window() {
        let req = CreateListRequest {
            start_date: "2025-08-25T23:59:59".to_string(),
            end_date: "2025-08-25T00:00:00".to_string(),
            ..valid_request()
        };

        let err = req.validate_fields().unwrap_err();
        assert_eq!(err.field(), Some("end_date"));
    }

    #[test]
    fn test_create_list_request_accepts_minute_precision_window() {
        let req = CreateListRequest {
            start_date: "2025-08-25T08:00".to_string(),
            end_date: "2025-08-25T18:30".to_string(),
            ..valid_request()
        };

        assert!(req.validate_fields().is_ok());
    }

    #[test]
    fn test_create_list_request_skips_absent_options_in_json() {
        let json = serde_json::to_string(&valid_request()).unwrap();

        assert!(!json.contains("condominium_id"));
        assert!(!json.contains("notes"));
        assert!(json.contains("created_by"));
    }

    #[test]
    fn test_update_list_serializes_only_set_fields() {
        let patch = UpdateList {
            status: Some(ListStatus::Published),
            ..UpdateList::default()
        };

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["status"], "published");
        assert!(json.get("notes").is_none());
        assert!(json.get("start_date").is_none());
    }
}
