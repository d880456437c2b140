//! Attendance session entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the attendance_sessions table.
///
/// `current_token` and `token_issued_at` back the rotating QR payload and
/// never leave the persistence/api boundary in member-facing responses.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub current_token: String,
    pub token_issued_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<SessionEntity> for domain::models::AttendanceSession {
    fn from(entity: SessionEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            title: entity.title,
            location: entity.location,
            starts_at: entity.starts_at,
            ends_at: entity.ends_at,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Session row with its attendance count, for club session listings.
#[derive(Debug, Clone, FromRow)]
pub struct SessionWithCountEntity {
    pub id: Uuid,
    pub title: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub attendance_count: i64,
}
