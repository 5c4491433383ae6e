//! Message and analytics event types, plus content validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{Error, Result, ValidationErrorCode};
use crate::fingerprint::Fingerprint;
use crate::limits::MAX_CONTENT_LEN;

/// Wire payload for `POST /messages`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Raw content as sent; trimmed and length-checked before persisting.
    #[validate(length(max = 2000))]
    pub content: String,
}

/// A persisted message record.
///
/// Immutable once written: there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub client_addr: Option<String>,
    pub user_agent: Option<String>,
    /// Opaque serialized collection metadata.
    pub fingerprint: String,
    pub session_id: String,
}

/// A message about to be inserted. The id is minted here, server-side.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub id: String,
    pub content: String,
    pub client_addr: Option<String>,
    pub user_agent: Option<String>,
    pub fingerprint: String,
    pub session_id: String,
}

impl NewMessage {
    /// Build a record from validated content and the request fingerprint.
    pub fn from_parts(content: String, fp: &Fingerprint) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            content,
            client_addr: fp.addr.clone(),
            user_agent: fp.user_agent.clone(),
            fingerprint: fp.to_blob(),
            session_id: fp.session_id.clone(),
        }
    }
}

/// Wire payload for `POST /analytics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsRequest {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// An analytics event about to be inserted. Write-only from the ingestion
/// path; nothing in the request flow ever reads these back.
#[derive(Debug, Clone)]
pub struct NewAnalyticsEvent {
    pub id: String,
    pub event_type: String,
    pub payload: String,
    pub client_addr: Option<String>,
    pub session_id: String,
}

impl NewAnalyticsEvent {
    pub fn new(event_type: impl Into<String>, payload: &serde_json::Value, fp: &Fingerprint) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_type: event_type.into(),
            payload: payload.to_string(),
            client_addr: fp.addr.clone(),
            session_id: fp.session_id.clone(),
        }
    }
}

/// Event type emitted when a submission arrives, before any outcome.
pub const EVENT_MESSAGE_ATTEMPT: &str = "message_attempt";
/// Event type emitted after a successful persist.
pub const EVENT_MESSAGE_SUBMITTED: &str = "message_submitted";
/// Event type emitted after a failed persist.
pub const EVENT_MESSAGE_FAILED: &str = "message_failed";

/// Trim and validate submission content.
///
/// Returns the trimmed content on success. Length is counted in characters,
/// not bytes, so multi-byte content is not unfairly truncated.
pub fn validate_content(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(
            ValidationErrorCode::Empty,
            "Message content cannot be empty",
        ));
    }
    if trimmed.chars().count() > MAX_CONTENT_LEN {
        return Err(Error::validation(
            ValidationErrorCode::TooLong,
            format!("Message exceeds {} characters", MAX_CONTENT_LEN),
        ));
    }
    Ok(trimmed.to_string())
}
