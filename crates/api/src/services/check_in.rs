//! Check-in service: turns a scanned QR payload into an attendance record.
//!
//! The flow is: parse the payload, verify the session exists and the caller
//! is a member of its club, evaluate the scan against the session window,
//! then insert the record. The insert is a guarded `ON CONFLICT DO NOTHING`
//! so concurrent double scans resolve to exactly one record.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use domain::models::attendance::{AttendanceStatus, CheckInRequest};
use domain::services::evaluator::{evaluate, ScanOutcome, SessionWindow};
use domain::services::token::{parse_payload, PayloadError};
use persistence::entities::AttendanceStatusDb;
use persistence::repositories::{AttendanceRepository, ClubRepository, SessionRepository};
use shared::validation::validate_scan_timestamp;

use crate::middleware::record_check_in;

/// Errors that can occur during a check-in attempt.
#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("Invalid check-in payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("Invalid check-in payload: {0}")]
    StaleTimestamp(String),

    #[error("Session not found")]
    SessionNotFound,

    #[error("You are not a member of this club")]
    NotMember,

    #[error("Already checked in for this session")]
    AlreadyCheckedIn,

    #[error("Session check-in window has closed")]
    WindowClosed,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Result of a successful check-in.
#[derive(Debug, Clone)]
pub struct CheckInResult {
    pub session_id: Uuid,
    pub status: AttendanceStatus,
    pub checked_in_at: chrono::DateTime<Utc>,
}

/// Check-in service.
pub struct CheckInService {
    sessions: SessionRepository,
    clubs: ClubRepository,
    attendance: AttendanceRepository,
    late_threshold: Duration,
}

impl CheckInService {
    /// Creates a new CheckInService.
    pub fn new(pool: PgPool, late_threshold_minutes: i64) -> Self {
        Self {
            sessions: SessionRepository::new(pool.clone()),
            clubs: ClubRepository::new(pool.clone()),
            attendance: AttendanceRepository::new(pool),
            late_threshold: Duration::minutes(late_threshold_minutes),
        }
    }

    /// Process a scanned check-in payload for the given user.
    pub async fn check_in(
        &self,
        user_id: Uuid,
        request: &CheckInRequest,
    ) -> Result<CheckInResult, CheckInError> {
        let payload = parse_payload(request).inspect_err(|_| record_check_in("invalid_payload"))?;

        if let Err(e) = validate_scan_timestamp(payload.issued_at) {
            record_check_in("invalid_payload");
            return Err(CheckInError::StaleTimestamp(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Scan timestamp out of range".to_string()),
            ));
        }

        let session = self
            .sessions
            .find_by_id(payload.session_id)
            .await?
            .ok_or_else(|| {
                record_check_in("session_not_found");
                CheckInError::SessionNotFound
            })?;

        // Only club members may check in
        let role = self.clubs.resolve_role(session.club_id, user_id).await?;
        if role.is_none() {
            record_check_in("not_member");
            return Err(CheckInError::NotMember);
        }

        // Cheap pre-check so a second scan returns a clean conflict without
        // hitting the unique constraint
        if self.attendance.exists(session.id, user_id).await? {
            record_check_in("already_checked_in");
            return Err(CheckInError::AlreadyCheckedIn);
        }

        let now = Utc::now();
        let window = SessionWindow {
            starts_at: session.starts_at,
            ends_at: session.ends_at,
        };

        let status = match evaluate(&window, self.late_threshold, now) {
            ScanOutcome::Present => AttendanceStatusDb::Present,
            ScanOutcome::Late => AttendanceStatusDb::Late,
            ScanOutcome::Rejected => {
                record_check_in("window_closed");
                return Err(CheckInError::WindowClosed);
            }
        };

        let record = self
            .attendance
            .insert_checked_in(session.id, user_id, status, now)
            .await?
            .ok_or_else(|| {
                // Lost a race with a concurrent scan from the same user
                record_check_in("already_checked_in");
                CheckInError::AlreadyCheckedIn
            })?;

        record_check_in(match record.status {
            AttendanceStatusDb::Late => "late",
            _ => "present",
        });

        tracing::info!(
            session_id = %session.id,
            user_id = %user_id,
            status = ?record.status,
            "Check-in recorded"
        );

        Ok(CheckInResult {
            session_id: session.id,
            status: record.status.into(),
            checked_in_at: record.checked_in_at.unwrap_or(now),
        })
    }
}
