//! Club repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{
    ClubEntity, ClubMembershipEntity, ClubRoleDb, ClubWithMembershipEntity, MemberWithUserEntity,
};
use crate::metrics::QueryTimer;

/// Repository for club-related database operations.
#[derive(Clone)]
pub struct ClubRepository {
    pool: PgPool,
}

impl ClubRepository {
    /// Creates a new ClubRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a club and enroll the creator as admin in one transaction.
    pub async fn create_club(
        &self,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<ClubEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_club");
        let mut tx = self.pool.begin().await?;

        let club = sqlx::query_as::<_, ClubEntity>(
            r#"
            INSERT INTO clubs (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, is_active, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO club_members (club_id, user_id, role)
            VALUES ($1, $2, 'admin')
            "#,
        )
        .bind(club.id)
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(club)
    }

    /// Find club by ID (active clubs only).
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ClubEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_club_by_id");
        let result = sqlx::query_as::<_, ClubEntity>(
            r#"
            SELECT id, name, description, is_active, created_by, created_at, updated_at
            FROM clubs
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Resolve a user's effective role in a club.
    ///
    /// The creator is admin whether or not a membership row exists; everyone
    /// else gets the role on their membership row. Returns `None` for
    /// non-members and for inactive clubs.
    pub async fn resolve_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ClubRoleDb>, sqlx::Error> {
        let timer = QueryTimer::new("resolve_club_role");
        let result = sqlx::query_scalar::<_, ClubRoleDb>(
            r#"
            SELECT CASE WHEN c.created_by = $2 THEN 'admin'::club_role ELSE m.role END
            FROM clubs c
            LEFT JOIN club_members m ON m.club_id = c.id AND m.user_id = $2
            WHERE c.id = $1
              AND c.is_active = true
              AND (c.created_by = $2 OR m.user_id IS NOT NULL)
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List clubs the user belongs to, with aggregates.
    pub async fn list_user_clubs(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<ClubWithMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_clubs");
        let result = sqlx::query_as::<_, ClubWithMembershipEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.created_by, c.created_at,
                CASE WHEN c.created_by = $1 THEN 'admin'::club_role ELSE m.role END AS role,
                m.joined_at,
                (SELECT COUNT(*) FROM club_members WHERE club_id = c.id) AS member_count,
                (SELECT COUNT(*) FROM attendance_sessions WHERE club_id = c.id) AS session_count
            FROM clubs c
            JOIN club_members m ON m.club_id = c.id AND m.user_id = $1
            WHERE c.is_active = true
            ORDER BY m.joined_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find one club with the caller's membership and aggregates.
    pub async fn find_with_membership(
        &self,
        club_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ClubWithMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_club_with_membership");
        let result = sqlx::query_as::<_, ClubWithMembershipEntity>(
            r#"
            SELECT
                c.id, c.name, c.description, c.created_by, c.created_at,
                CASE WHEN c.created_by = $2 THEN 'admin'::club_role ELSE m.role END AS role,
                COALESCE(m.joined_at, c.created_at) AS joined_at,
                (SELECT COUNT(*) FROM club_members WHERE club_id = c.id) AS member_count,
                (SELECT COUNT(*) FROM attendance_sessions WHERE club_id = c.id) AS session_count
            FROM clubs c
            LEFT JOIN club_members m ON m.club_id = c.id AND m.user_id = $2
            WHERE c.id = $1
              AND c.is_active = true
              AND (c.created_by = $2 OR m.user_id IS NOT NULL)
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add a member to a club.
    ///
    /// Returns `None` when the user is already a member.
    pub async fn add_member(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: ClubRoleDb,
    ) -> Result<Option<ClubMembershipEntity>, sqlx::Error> {
        let timer = QueryTimer::new("add_club_member");
        let result = sqlx::query_as::<_, ClubMembershipEntity>(
            r#"
            INSERT INTO club_members (club_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (club_id, user_id) DO NOTHING
            RETURNING id, club_id, user_id, role, joined_at
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List club members with user info, paginated.
    pub async fn list_members(
        &self,
        club_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MemberWithUserEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_club_members");
        let result = sqlx::query_as::<_, MemberWithUserEntity>(
            r#"
            SELECT m.id, m.user_id, m.role, m.joined_at, u.display_name
            FROM club_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.club_id = $1
            ORDER BY m.joined_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(club_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count club members.
    pub async fn count_members(&self, club_id: Uuid) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_club_members");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM club_members WHERE club_id = $1
            "#,
        )
        .bind(club_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Change a member's role. Returns the number of rows affected.
    pub async fn update_member_role(
        &self,
        club_id: Uuid,
        user_id: Uuid,
        role: ClubRoleDb,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_member_role");
        let result = sqlx::query(
            r#"
            UPDATE club_members
            SET role = $3
            WHERE club_id = $1 AND user_id = $2
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .bind(role)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Remove a member from a club. Returns the number of rows affected.
    pub async fn remove_member(&self, club_id: Uuid, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("remove_club_member");
        let result = sqlx::query(
            r#"
            DELETE FROM club_members
            WHERE club_id = $1 AND user_id = $2
            "#,
        )
        .bind(club_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }

    /// Soft delete a club. Returns the number of rows affected.
    pub async fn deactivate_club(&self, club_id: Uuid) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("deactivate_club");
        let result = sqlx::query(
            r#"
            UPDATE clubs
            SET is_active = false, updated_at = NOW()
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(club_id)
        .execute(&self.pool)
        .await?;
        timer.record();
        Ok(result.rows_affected())
    }
}
