//! Attendance session repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{SessionEntity, SessionWithCountEntity};
use crate::metrics::QueryTimer;

/// Repository for session-related database operations.
#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Creates a new SessionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a session with its initial check-in token.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_session(
        &self,
        club_id: Uuid,
        title: &str,
        location: Option<&str>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        token: &str,
        token_issued_at: DateTime<Utc>,
        created_by: Uuid,
    ) -> Result<SessionEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_session");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            INSERT INTO attendance_sessions
                (club_id, title, location, starts_at, ends_at, current_token, token_issued_at, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, club_id, title, location, starts_at, ends_at,
                      current_token, token_issued_at, created_by, created_at
            "#,
        )
        .bind(club_id)
        .bind(title)
        .bind(location)
        .bind(starts_at)
        .bind(ends_at)
        .bind(token)
        .bind(token_issued_at)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find session by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_session_by_id");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            SELECT id, club_id, title, location, starts_at, ends_at,
                   current_token, token_issued_at, created_by, created_at
            FROM attendance_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List a club's sessions with attendance counts, newest first.
    pub async fn list_for_club(
        &self,
        club_id: Uuid,
    ) -> Result<Vec<SessionWithCountEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_club_sessions");
        let result = sqlx::query_as::<_, SessionWithCountEntity>(
            r#"
            SELECT
                s.id, s.title, s.location, s.starts_at, s.ends_at,
                (SELECT COUNT(*) FROM attendance WHERE session_id = s.id) AS attendance_count
            FROM attendance_sessions s
            WHERE s.club_id = $1
            ORDER BY s.starts_at DESC
            "#,
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Replace a session's check-in token.
    pub async fn update_token(
        &self,
        session_id: Uuid,
        token: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Option<SessionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_session_token");
        let result = sqlx::query_as::<_, SessionEntity>(
            r#"
            UPDATE attendance_sessions
            SET current_token = $2, token_issued_at = $3
            WHERE id = $1
            RETURNING id, club_id, title, location, starts_at, ends_at,
                      current_token, token_issued_at, created_by, created_at
            "#,
        )
        .bind(session_id)
        .bind(token)
        .bind(issued_at)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// IDs of sessions whose window contains `now`, for token rotation.
    pub async fn list_open_session_ids(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Uuid>, sqlx::Error> {
        let timer = QueryTimer::new("list_open_session_ids");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM attendance_sessions
            WHERE starts_at <= $1 AND ends_at >= $1
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count a club's sessions.
    pub async fn count_for_club(&self, club_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_club_sessions");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM attendance_sessions WHERE club_id = $1
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
    // Note: SessionRepository tests require database connection and are covered by integration tests
}
