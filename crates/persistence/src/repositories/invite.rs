//! Invite repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ClubInviteEntity, InviteWithClubEntity};
use crate::metrics::QueryTimer;

/// Repository for invite-related database operations.
#[derive(Clone)]
pub struct InviteRepository {
    pool: PgPool,
}

impl InviteRepository {
    /// Creates a new InviteRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Issue a fresh invite for a club, deactivating all prior invites.
    ///
    /// Both steps run in one transaction so a club never carries two active
    /// codes.
    pub async fn rotate_invite(
        &self,
        club_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
        created_by: Uuid,
    ) -> Result<ClubInviteEntity, sqlx::Error> {
        let timer = QueryTimer::new("rotate_invite");
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE club_invites
            SET is_active = false
            WHERE club_id = $1 AND is_active = true
            "#,
        )
        .bind(club_id)
        .execute(&mut *tx)
        .await?;

        let invite = sqlx::query_as::<_, ClubInviteEntity>(
            r#"
            INSERT INTO club_invites (club_id, code, expires_at, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, club_id, code, expires_at, is_active, created_by, created_at
            "#,
        )
        .bind(club_id)
        .bind(code)
        .bind(expires_at)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(invite)
    }

    /// Find the club's current active invite, if any.
    pub async fn find_current(
        &self,
        club_id: Uuid,
    ) -> Result<Option<ClubInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_current_invite");
        let result = sqlx::query_as::<_, ClubInviteEntity>(
            r#"
            SELECT id, club_id, code, expires_at, is_active, created_by, created_at
            FROM club_invites
            WHERE club_id = $1 AND is_active = true
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(club_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a redeemable invite by code (active and not expired).
    pub async fn find_redeemable_by_code(
        &self,
        code: &str,
    ) -> Result<Option<ClubInviteEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_redeemable_invite");
        let now = Utc::now();
        let result = sqlx::query_as::<_, ClubInviteEntity>(
            r#"
            SELECT i.id, i.club_id, i.code, i.expires_at, i.is_active, i.created_by, i.created_at
            FROM club_invites i
            JOIN clubs c ON c.id = i.club_id
            WHERE i.code = $1
              AND i.is_active = true
              AND i.expires_at > $2
              AND c.is_active = true
            "#,
        )
        .bind(code)
        .bind(now)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invite by code with club info (for public preview).
    ///
    /// Returns expired and deactivated invites too; the caller reports
    /// validity instead of hiding the invite.
    pub async fn find_by_code_with_club(
        &self,
        code: &str,
    ) -> Result<Option<InviteWithClubEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invite_by_code_with_club");
        let result = sqlx::query_as::<_, InviteWithClubEntity>(
            r#"
            SELECT
                i.id, i.club_id, i.code, i.expires_at, i.is_active,
                c.name AS club_name,
                (SELECT COUNT(*) FROM club_members WHERE club_id = c.id) AS member_count
            FROM club_invites i
            JOIN clubs c ON c.id = i.club_id
            WHERE i.code = $1 AND c.is_active = true
            ORDER BY i.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Deactivate invites whose expiry has passed. Returns rows affected.
    pub async fn deactivate_expired(&self, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_expired_invites");
        let result = sqlx::query(
            r#"
            UPDATE club_invites
            SET is_active = false
            WHERE is_active = true AND expires_at <= $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Check if code exists.
    pub async fn code_exists(&self, code: &str) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("check_invite_code_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM club_invites WHERE code = $1)
            "#,
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Generate unique invite code by retrying if collision.
    pub async fn generate_unique_code<F>(&self, generator: F) -> Result<String, sqlx::Error>
    where
        F: Fn() -> String,
    {
        let mut code = generator();
        let mut attempts = 0;

        while self.code_exists(&code).await? {
            code = generator();
            attempts += 1;
            if attempts > 100 {
                return Err(sqlx::Error::Protocol(
                    "Could not generate unique invite code".to_string(),
                ));
            }
        }

        Ok(code)
    }
}
