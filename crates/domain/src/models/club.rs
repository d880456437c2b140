//! Club domain models: clubs, memberships and roles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::user::UserPublic;
use shared::pagination::PageInfo;

/// Role within a club.
///
/// The club creator is an admin even when no membership row exists; the
/// effective role is always derived through
/// `ClubRepository::resolve_role`, never from the membership row alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClubRole {
    Admin,
    Member,
}

impl ClubRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClubRole::Admin => "admin",
            ClubRole::Member => "member",
        }
    }

    /// Returns true if this role can manage the club: create sessions,
    /// regenerate invites, change member roles, delete the club, display QR.
    pub fn can_manage_club(&self) -> bool {
        matches!(self, ClubRole::Admin)
    }
}

impl FromStr for ClubRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(ClubRole::Admin),
            "member" => Ok(ClubRole::Member),
            _ => Err(format!("Invalid club role: {}", s)),
        }
    }
}

impl fmt::Display for ClubRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A club (organization) that members join and attend sessions for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a club.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubMembership {
    pub id: Uuid,
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

/// Request payload for creating a club.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateClubRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Response for club listing (minimal info).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubSummary {
    pub id: Uuid,
    pub name: String,
    pub member_count: i64,
    pub your_role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

/// Response for club detail.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubDetail {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
    pub session_count: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub your_role: ClubRole,
}

/// Response for creating a club.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateClubResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub your_role: ClubRole,
}

/// Response for listing the caller's clubs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListClubsResponse {
    pub data: Vec<ClubSummary>,
    pub count: usize,
}

/// Member entry in a member listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MemberResponse {
    pub id: Uuid,
    pub user: UserPublic,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

/// Response for listing club members.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMembersResponse {
    pub data: Vec<MemberResponse>,
    pub pagination: PageInfo,
}

/// Request to change a member's role.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRoleRequest {
    pub role: ClubRole,
}

/// Response after changing a member's role.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UpdateRoleResponse {
    pub club_id: Uuid,
    pub user_id: Uuid,
    pub role: ClubRole,
}

/// Request to join a club by invite code.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct JoinClubRequest {
    #[validate(length(min = 1, max = 32, message = "Invite code is required"))]
    pub code: String,
}

/// Response after joining a club.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct JoinClubResponse {
    pub club_id: Uuid,
    pub club_name: String,
    pub role: ClubRole,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_role_round_trip() {
        assert_eq!(ClubRole::from_str("admin").unwrap(), ClubRole::Admin);
        assert_eq!(ClubRole::from_str("MEMBER").unwrap(), ClubRole::Member);
        assert!(ClubRole::from_str("owner").is_err());
        assert_eq!(format!("{}", ClubRole::Admin), "admin");
    }

    #[test]
    fn test_club_role_permissions() {
        assert!(ClubRole::Admin.can_manage_club());
        assert!(!ClubRole::Member.can_manage_club());
    }

    #[test]
    fn test_create_club_request_validation() {
        let ok = CreateClubRequest {
            name: "Chess Club".to_string(),
            description: Some("Weekly games".to_string()),
        };
        assert!(ok.validate().is_ok());

        let empty_name = CreateClubRequest {
            name: String::new(),
            description: None,
        };
        assert!(empty_name.validate().is_err());

        let long_description = CreateClubRequest {
            name: "Chess Club".to_string(),
            description: Some("x".repeat(501)),
        };
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_club_role_serde() {
        assert_eq!(serde_json::to_string(&ClubRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::from_str::<ClubRole>("\"member\"").unwrap(),
            ClubRole::Member
        );
    }
}
