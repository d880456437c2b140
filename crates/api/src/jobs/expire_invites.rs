//! Background job that deactivates expired club invites.

use chrono::Utc;
use sqlx::PgPool;

use persistence::repositories::InviteRepository;

use super::scheduler::{Job, JobFrequency};

/// Job that periodically deactivates invites whose expiry has passed.
///
/// Expired invites are already unredeemable; this keeps the table's
/// `is_active` flags honest for listings and the public preview.
pub struct InviteExpiryJob {
    invites: InviteRepository,
}

impl InviteExpiryJob {
    /// Create a new invite expiry job.
    pub fn new(pool: PgPool) -> Self {
        Self {
            invites: InviteRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl Job for InviteExpiryJob {
    fn name(&self) -> &'static str {
        "expire_invites"
    }

    fn frequency(&self) -> JobFrequency {
        JobFrequency::Hourly
    }

    async fn execute(&self) -> Result<(), String> {
        let deactivated = self
            .invites
            .deactivate_expired(Utc::now())
            .await
            .map_err(|e| format!("Failed to deactivate expired invites: {}", e))?;

        if deactivated > 0 {
            tracing::info!(deactivated, "Expired invites deactivated");
        }

        Ok(())
    }
}
