//! Attendance repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    AttendanceEntity, AttendanceStatusDb, AttendanceWithUserEntity, StatusCountsRow,
    UserAttendanceRowEntity,
};
use crate::metrics::QueryTimer;

/// Repository for attendance-related database operations.
#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Creates a new AttendanceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a check-in if no record exists yet for this (session, user).
    ///
    /// The unique constraint makes the insert an atomic check-and-set:
    /// `None` means another scan won the race and nothing was written.
    pub async fn insert_checked_in(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        status: AttendanceStatusDb,
        checked_in_at: DateTime<Utc>,
    ) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("insert_checked_in");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            INSERT INTO attendance (session_id, user_id, status, checked_in_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_id, user_id) DO NOTHING
            RETURNING id, session_id, user_id, status, checked_in_at, note, created_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(status)
        .bind(checked_in_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a record already exists for this (session, user).
    pub async fn exists(&self, session_id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("attendance_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM attendance WHERE session_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a session's attendance records with user info.
    pub async fn list_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<AttendanceWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_session_attendance");
        let result = sqlx::query_as::<_, AttendanceWithUserEntity>(
            r#"
            SELECT a.id, a.user_id, a.status, a.checked_in_at, a.note, u.display_name
            FROM attendance a
            JOIN users u ON u.id = a.user_id
            WHERE a.session_id = $1
            ORDER BY a.checked_in_at ASC NULLS LAST, a.created_at ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Amend an existing record's status and note.
    ///
    /// Never creates a record; returns `None` when no row exists for the
    /// (session, user) pair.
    pub async fn update_status(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        status: AttendanceStatusDb,
        note: Option<&str>,
    ) -> Result<Option<AttendanceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_attendance_status");
        let result = sqlx::query_as::<_, AttendanceEntity>(
            r#"
            UPDATE attendance
            SET status = $3, note = $4
            WHERE session_id = $1 AND user_id = $2
            RETURNING id, session_id, user_id, status, checked_in_at, note, created_at
            "#,
        )
        .bind(session_id)
        .bind(user_id)
        .bind(status)
        .bind(note)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// A user's attendance history across all their clubs, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserAttendanceRowEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_attendance");
        let result = sqlx::query_as::<_, UserAttendanceRowEntity>(
            r#"
            SELECT
                s.id AS session_id, s.title AS session_title,
                c.id AS club_id, c.name AS club_name,
                a.status, a.checked_in_at
            FROM attendance a
            JOIN attendance_sessions s ON s.id = a.session_id
            JOIN clubs c ON c.id = s.club_id
            WHERE a.user_id = $1
            ORDER BY s.starts_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-status counts for one user across all sessions.
    pub async fn status_counts_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<StatusCountsRow, sqlx::Error> {
        let timer = QueryTimer::new("user_status_counts");
        let result = sqlx::query_as::<_, StatusCountsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'present') AS present,
                COUNT(*) FILTER (WHERE status = 'late') AS late,
                COUNT(*) FILTER (WHERE status = 'absent') AS absent,
                COUNT(*) FILTER (WHERE status = 'excused') AS excused
            FROM attendance
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Per-status counts across all of a club's sessions.
    pub async fn status_counts_for_club(
        &self,
        club_id: Uuid,
    ) -> Result<StatusCountsRow, sqlx::Error> {
        let timer = QueryTimer::new("club_status_counts");
        let result = sqlx::query_as::<_, StatusCountsRow>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE a.status = 'present') AS present,
                COUNT(*) FILTER (WHERE a.status = 'late') AS late,
                COUNT(*) FILTER (WHERE a.status = 'absent') AS absent,
                COUNT(*) FILTER (WHERE a.status = 'excused') AS excused
            FROM attendance a
            JOIN attendance_sessions s ON s.id = a.session_id
            WHERE s.club_id = $1
            "#,
        )
        .bind(club_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[cfg(test)]
mod tests {
    // Note: AttendanceRepository tests require database connection and are covered by integration tests
}
