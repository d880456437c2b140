//! Attendance session domain models.
//!
//! A session is a time-boxed event belonging to one club. Sessions are
//! immutable once created; there is no edit flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::validate_session_window;

/// A time-boxed attendance session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AttendanceSession {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating a session.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
#[validate(schema(function = "validate_window"))]
pub struct CreateSessionRequest {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Title must be between 1 and 200 characters"
    ))]
    pub title: String,

    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,

    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

fn validate_window(request: &CreateSessionRequest) -> Result<(), validator::ValidationError> {
    validate_session_window(request.starts_at, request.ends_at)
}

/// Response for a single session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceSession> for SessionResponse {
    fn from(session: AttendanceSession) -> Self {
        Self {
            id: session.id,
            club_id: session.club_id,
            title: session.title,
            location: session.location,
            starts_at: session.starts_at,
            ends_at: session.ends_at,
            created_by: session.created_by,
            created_at: session.created_at,
        }
    }
}

/// Session entry in a club's session listing, with attendance counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionSummary {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub attendance_count: i64,
}

/// Response for listing a club's sessions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListSessionsResponse {
    pub data: Vec<SessionSummary>,
    pub count: usize,
}

/// Response for issuing or refreshing a session's check-in payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct QrPayloadResponse {
    pub url: String,
    pub token: String,
    pub issued_at: DateTime<Utc>,
}
