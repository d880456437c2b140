//! Invite routes: rotating club invite codes and the public preview.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{Duration, Utc};
use tracing::info;
use validator::Validate;

use domain::models::invite::{
    CreateInviteRequest, InviteResponse, PublicClubInfo, PublicInviteInfo,
};
use persistence::repositories::InviteRepository;
use shared::crypto::generate_invite_code;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::ClubAccess;

/// Default invite lifetime when the request does not specify one (7 days).
const DEFAULT_EXPIRES_IN_HOURS: i64 = 168;

/// Issue a fresh invite code, deactivating any prior code. Admins only.
///
/// POST /api/v1/clubs/:club_id/invites
pub async fn regenerate_invite(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), ApiError> {
    request.validate()?;

    let repo = InviteRepository::new(state.pool.clone());

    let code = repo.generate_unique_code(generate_invite_code).await?;
    let expires_in_hours = request.expires_in_hours.unwrap_or(DEFAULT_EXPIRES_IN_HOURS);
    let expires_at = Utc::now() + Duration::hours(expires_in_hours);

    let invite = repo
        .rotate_invite(access.club_id, &code, expires_at, user_auth.user_id)
        .await?;

    info!(
        club_id = %access.club_id,
        invite_id = %invite.id,
        user_id = %user_auth.user_id,
        "Invite regenerated"
    );

    Ok((
        StatusCode::CREATED,
        Json(InviteResponse {
            id: invite.id,
            club_id: invite.club_id,
            code: invite.code,
            expires_at: invite.expires_at,
            created_by: invite.created_by,
            created_at: invite.created_at,
        }),
    ))
}

/// Get the club's current active invite. Admins only.
///
/// GET /api/v1/clubs/:club_id/invites
pub async fn get_current_invite(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
) -> Result<Json<InviteResponse>, ApiError> {
    let repo = InviteRepository::new(state.pool.clone());

    let invite = repo
        .find_current(access.club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No active invite for this club".to_string()))?;

    Ok(Json(InviteResponse {
        id: invite.id,
        club_id: invite.club_id,
        code: invite.code,
        expires_at: invite.expires_at,
        created_by: invite.created_by,
        created_at: invite.created_at,
    }))
}

/// Public invite preview by code (no auth required).
///
/// GET /api/v1/invites/:code
///
/// Returns limited club info; expired or deactivated invites are reported
/// with `is_valid: false` rather than hidden.
pub async fn get_invite_info(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<PublicInviteInfo>, ApiError> {
    let repo = InviteRepository::new(state.pool.clone());

    let invite = repo
        .find_by_code_with_club(code.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found".to_string()))?;

    let now = Utc::now();
    let is_valid = invite.is_active && invite.expires_at > now;

    Ok(Json(PublicInviteInfo {
        club: PublicClubInfo {
            name: invite.club_name,
            member_count: invite.member_count,
        },
        expires_at: invite.expires_at,
        is_valid,
    }))
}
