//! Club invite domain models.
//!
//! A club has at most one active invite at a time: issuing a new code
//! deactivates every prior invite for that club.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A rotating invite code bound to a club.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClubInvite {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl ClubInvite {
    /// Returns true if the invite can still be redeemed.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }
}

/// Request payload for regenerating a club invite.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInviteRequest {
    #[validate(range(min = 1, max = 720, message = "Expiry must be between 1 and 720 hours"))]
    pub expires_in_hours: Option<i64>,
}

/// Response for the club's current invite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct InviteResponse {
    pub id: Uuid,
    pub club_id: Uuid,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Limited club info shown on the public invite preview.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicClubInfo {
    pub name: String,
    pub member_count: i64,
}

/// Public invite preview (no auth required).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicInviteInfo {
    pub club: PublicClubInfo,
    pub expires_at: DateTime<Utc>,
    pub is_valid: bool,
}
