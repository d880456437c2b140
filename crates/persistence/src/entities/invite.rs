//! Club invite entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the club_invites table.
#[derive(Debug, Clone, FromRow)]
pub struct ClubInviteEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<ClubInviteEntity> for domain::models::ClubInvite {
    fn from(entity: ClubInviteEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            code: entity.code,
            expires_at: entity.expires_at,
            is_active: entity.is_active,
            created_by: entity.created_by,
            created_at: entity.created_at,
        }
    }
}

/// Invite with club info, for the public preview lookup.
#[derive(Debug, Clone, FromRow)]
pub struct InviteWithClubEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub club_name: String,
    pub member_count: i64,
}
