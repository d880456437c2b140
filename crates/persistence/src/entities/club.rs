//! Club entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::club::ClubRole;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for club_role that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "club_role", rename_all = "lowercase")]
pub enum ClubRoleDb {
    Admin,
    Member,
}

impl From<ClubRoleDb> for ClubRole {
    fn from(db_role: ClubRoleDb) -> Self {
        match db_role {
            ClubRoleDb::Admin => ClubRole::Admin,
            ClubRoleDb::Member => ClubRole::Member,
        }
    }
}

impl From<ClubRole> for ClubRoleDb {
    fn from(role: ClubRole) -> Self {
        match role {
            ClubRole::Admin => ClubRoleDb::Admin,
            ClubRole::Member => ClubRoleDb::Member,
        }
    }
}

/// Database row mapping for the clubs table.
#[derive(Debug, Clone, FromRow)]
pub struct ClubEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClubEntity> for domain::models::Club {
    fn from(entity: ClubEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            is_active: entity.is_active,
            created_by: entity.created_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Database row mapping for the club_members table.
#[derive(Debug, Clone, FromRow)]
pub struct ClubMembershipEntity {
    pub id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRoleDb,
    pub joined_at: DateTime<Utc>,
}

impl From<ClubMembershipEntity> for domain::models::ClubMembership {
    fn from(entity: ClubMembershipEntity) -> Self {
        Self {
            id: entity.id,
            club_id: entity.club_id,
            user_id: entity.user_id,
            role: entity.role.into(),
            joined_at: entity.joined_at,
        }
    }
}

/// Extended club entity with the caller's membership info and aggregates.
#[derive(Debug, Clone, FromRow)]
pub struct ClubWithMembershipEntity {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    // Effective role; the creator is admin even without a membership row.
    pub role: ClubRoleDb,
    pub joined_at: DateTime<Utc>,
    // Aggregates
    pub member_count: i64,
    pub session_count: i64,
}

/// Member entity with user info for listing members.
#[derive(Debug, Clone, FromRow)]
pub struct MemberWithUserEntity {
    // Membership fields
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRoleDb,
    pub joined_at: DateTime<Utc>,
    // User fields
    pub display_name: String,
}
