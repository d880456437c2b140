//! Attendance domain models: records, statuses and statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::user::UserPublic;

/// Status of an attendance record.
///
/// `Present` and `Late` are produced by the check-in flow; `Absent` and
/// `Excused` only ever appear through an admin amending an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Late,
    Absent,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Excused => "excused",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "present" => Ok(AttendanceStatus::Present),
            "late" => Ok(AttendanceStatus::Late),
            "absent" => Ok(AttendanceStatus::Absent),
            "excused" => Ok(AttendanceStatus::Excused),
            _ => Err(format!("Invalid attendance status: {}", s)),
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's attendance record for one session.
///
/// At most one record exists per (session, user) pair; the database enforces
/// this with a unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Attendance {
    pub id: Uuid,
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub status: AttendanceStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The scanned check-in payload as submitted by the client.
///
/// Fields mirror the query parameters of the QR payload URL; parsing and
/// validation happen in `services::token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckInRequest {
    pub session: String,
    pub token: String,
    pub ts: String,
}

/// Response for a successful check-in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CheckInResponse {
    pub session_id: Uuid,
    pub status: AttendanceStatus,
    pub checked_in_at: DateTime<Utc>,
}

/// Attendance entry in a session roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AttendanceRecordResponse {
    pub id: Uuid,
    pub user: UserPublic,
    pub status: AttendanceStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Response for a session's attendance roster.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionRosterResponse {
    pub session_id: Uuid,
    pub data: Vec<AttendanceRecordResponse>,
    pub count: usize,
}

/// Request for an admin amending an existing attendance record.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateAttendanceRequest {
    pub status: AttendanceStatus,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

/// One entry of a user's attendance history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserAttendanceEntry {
    pub session_id: Uuid,
    pub session_title: String,
    pub club_id: Uuid,
    pub club_name: String,
    pub status: AttendanceStatus,
    pub checked_in_at: Option<DateTime<Utc>>,
}

/// Per-status counts plus the derived attendance rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AttendanceStats {
    pub present: i64,
    pub late: i64,
    pub absent: i64,
    pub excused: i64,
    /// (present + late) / total, or 0 when there are no records.
    pub attendance_rate: f64,
}

impl AttendanceStats {
    pub fn from_counts(present: i64, late: i64, absent: i64, excused: i64) -> Self {
        let total = present + late + absent + excused;
        let attendance_rate = if total > 0 {
            (present + late) as f64 / total as f64
        } else {
            0.0
        };
        Self {
            present,
            late,
            absent,
            excused,
            attendance_rate,
        }
    }
}

/// Response for a user's attendance history with aggregate stats.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserAttendanceResponse {
    pub data: Vec<UserAttendanceEntry>,
    pub stats: AttendanceStats,
}

/// Response for per-club statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubStatsResponse {
    pub club_id: Uuid,
    pub member_count: i64,
    pub session_count: i64,
    pub stats: AttendanceStats,
}
