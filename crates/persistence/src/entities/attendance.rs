//! Attendance entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::attendance::AttendanceStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for attendance_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "lowercase")]
pub enum AttendanceStatusDb {
    Present,
    Late,
    Absent,
    Excused,
}

impl From<AttendanceStatusDb> for AttendanceStatus {
    fn from(db_status: AttendanceStatusDb) -> Self {
        match db_status {
            AttendanceStatusDb::Present => AttendanceStatus::Present,
            AttendanceStatusDb::Late => AttendanceStatus::Late,
            AttendanceStatusDb::Absent => AttendanceStatus::Absent,
            AttendanceStatusDb::Excused => AttendanceStatus::Excused,
        }
    }
}

impl From<AttendanceStatus> for AttendanceStatusDb {
    fn from(status: AttendanceStatus) -> Self {
        match status {
            AttendanceStatus::Present => AttendanceStatusDb::Present,
            AttendanceStatus::Late => AttendanceStatusDb::Late,
            AttendanceStatus::Absent => AttendanceStatusDb::Absent,
            AttendanceStatus::Excused => AttendanceStatusDb::Excused,
        }
    }
}

/// Database row mapping for the attendance table.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceEntity {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub status: AttendanceStatusDb,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceEntity> for domain::models::Attendance {
    fn from(entity: AttendanceEntity) -> Self {
        Self {
            id: entity.id,
            session_id: entity.session_id,
            user_id: entity.user_id,
            status: entity.status.into(),
            checked_in_at: entity.checked_in_at,
            note: entity.note,
            created_at: entity.created_at,
        }
    }
}

/// Attendance row with user info, for session rosters.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceWithUserEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: AttendanceStatusDb,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub display_name: String,
}

/// Attendance row joined with session and club info, for user history.
#[derive(Debug, Clone, FromRow)]
pub struct UserAttendanceRowEntity {
    pub session_id: Uuid,
    pub session_title: String,
    pub club_id: Uuid,
    pub club_name: String,
    pub status: AttendanceStatusDb,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Per-status aggregate counts.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct StatusCountsRow {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
}
