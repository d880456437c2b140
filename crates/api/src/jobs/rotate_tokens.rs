//! Background job that rotates check-in tokens for open sessions.
//!
//! Rotation refreshes the QR payload displayed by admins; it does not affect
//! the server-side evaluation of scans already in flight.

use chrono::Utc;
use sqlx::PgPool;

use domain::services::token;
use persistence::repositories::SessionRepository;

use super::scheduler::{Job, JobFrequency};
use crate::middleware::record_tokens_rotated;

/// Job that periodically replaces the check-in token of every session whose
/// window is currently open.
pub struct TokenRotationJob {
    sessions: SessionRepository,
    rotation_secs: u64,
}

impl TokenRotationJob {
    /// Create a new token rotation job.
    pub fn new(pool: PgPool, rotation_secs: u64) -> Self {
        Self {
            sessions: SessionRepository::new(pool),
            rotation_secs,
        }
    }
}

#[async_trait::async_trait]
impl Job for TokenRotationJob {
    fn name(&self) -> &'static str {
        "rotate_session_tokens"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Seconds(self.rotation_secs)
    }

    async fn execute(&self) -> Result<(), String> {
        let now = Utc::now();

        let session_ids = self
            .sessions
            .list_open_session_ids(now)
            .await
            .map_err(|e| format!("Failed to list open sessions: {}", e))?;

        let mut rotated = 0usize;
        for session_id in session_ids {
            let issued = token::issue(Utc::now());
            match self
                .sessions
                .update_token(session_id, &issued.token, issued.issued_at)
                .await
            {
                Ok(Some(_)) => rotated += 1,
                Ok(None) => {
                    tracing::warn!(session_id = %session_id, "Session vanished during rotation");
                }
                Err(e) => {
                    // Keep rotating the remaining sessions
                    tracing::error!(
                        session_id = %session_id,
                        error = %e,
                        "Failed to rotate session token"
                    );
                }
            }
        }

        if rotated > 0 {
            record_tokens_rotated(rotated);
            tracing::debug!(rotated, "Session tokens rotated");
        }

        Ok(())
    }
}
