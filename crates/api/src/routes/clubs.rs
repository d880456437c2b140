//! Club routes: creation, listing, membership management and stats.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::attendance::{AttendanceStats, ClubStatsResponse};
use domain::models::club::{
    ClubDetail, ClubSummary, CreateClubRequest, CreateClubResponse, JoinClubRequest,
    JoinClubResponse, ListClubsResponse, ListMembersResponse, MemberResponse, UpdateRoleRequest,
    UpdateRoleResponse,
};
use domain::models::user::UserPublic;
use domain::models::ClubRole;
use persistence::entities::ClubRoleDb;
use persistence::repositories::{
    AttendanceRepository, ClubRepository, InviteRepository, SessionRepository,
};
use shared::pagination::{PageInfo, PageParams};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::ClubAccess;

/// Create a new club. The creator is enrolled as admin.
///
/// POST /api/v1/clubs
pub async fn create_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateClubRequest>,
) -> Result<(StatusCode, Json<CreateClubResponse>), ApiError> {
    request.validate()?;

    let repo = ClubRepository::new(state.pool.clone());

    let club = repo
        .create_club(
            request.name.trim(),
            request.description.as_deref(),
            user_auth.user_id,
        )
        .await?;

    info!(club_id = %club.id, user_id = %user_auth.user_id, "Club created");

    Ok((
        StatusCode::CREATED,
        Json(CreateClubResponse {
            id: club.id,
            name: club.name,
            description: club.description,
            created_by: club.created_by,
            created_at: club.created_at,
            your_role: ClubRole::Admin,
        }),
    ))
}

/// List the caller's clubs.
///
/// GET /api/v1/clubs
pub async fn list_clubs(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListClubsResponse>, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let clubs = repo.list_user_clubs(user_auth.user_id).await?;

    let data: Vec<ClubSummary> = clubs
        .into_iter()
        .map(|c| ClubSummary {
            id: c.id,
            name: c.name,
            member_count: c.member_count,
            your_role: c.role.into(),
            joined_at: c.joined_at,
        })
        .collect();

    let count = data.len();
    Ok(Json(ListClubsResponse { data, count }))
}

/// Get club detail. Members only.
///
/// GET /api/v1/clubs/:club_id
pub async fn get_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
) -> Result<Json<ClubDetail>, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let club = repo
        .find_with_membership(access.club_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Club not found".to_string()))?;

    Ok(Json(ClubDetail {
        id: club.id,
        name: club.name,
        description: club.description,
        member_count: club.member_count,
        session_count: club.session_count,
        created_by: club.created_by,
        created_at: club.created_at,
        your_role: club.role.into(),
    }))
}

/// Soft delete a club. Admins only.
///
/// DELETE /api/v1/clubs/:club_id
pub async fn delete_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
) -> Result<StatusCode, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let rows_affected = repo.deactivate_club(access.club_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Club not found".to_string()));
    }

    info!(club_id = %access.club_id, user_id = %user_auth.user_id, "Club deactivated");

    Ok(StatusCode::NO_CONTENT)
}

/// List club members. Members only.
///
/// GET /api/v1/clubs/:club_id/members
pub async fn list_members(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
    Query(params): Query<PageParams>,
) -> Result<Json<ListMembersResponse>, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let members = repo
        .list_members(access.club_id, params.per_page(), params.offset())
        .await?;
    let total = repo.count_members(access.club_id).await?;

    let data: Vec<MemberResponse> = members
        .into_iter()
        .map(|m| MemberResponse {
            id: m.id,
            user: UserPublic {
                id: m.user_id,
                display_name: m.display_name,
            },
            role: m.role.into(),
            joined_at: m.joined_at,
        })
        .collect();

    Ok(Json(ListMembersResponse {
        data,
        pagination: PageInfo::new(params, total),
    }))
}

/// Change a member's role. Admins only.
///
/// PUT /api/v1/clubs/:club_id/members/:user_id/role
pub async fn update_member_role(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, target_user_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UpdateRoleResponse>, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let club = repo
        .find_by_id(access.club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Club not found".to_string()))?;

    // The creator's admin role is implicit and cannot be changed
    if target_user_id == club.created_by {
        return Err(ApiError::Validation(
            "The club creator's role cannot be changed".to_string(),
        ));
    }

    let role_db: ClubRoleDb = request.role.into();
    let rows_affected = repo
        .update_member_role(access.club_id, target_user_id, role_db)
        .await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        club_id = %access.club_id,
        target_user_id = %target_user_id,
        role = %request.role,
        changed_by = %user_auth.user_id,
        "Member role changed"
    );

    Ok(Json(UpdateRoleResponse {
        club_id: access.club_id,
        user_id: target_user_id,
        role: request.role,
    }))
}

/// Remove a member from the club. Admins only.
///
/// DELETE /api/v1/clubs/:club_id/members/:user_id
pub async fn remove_member(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, target_user_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let repo = ClubRepository::new(state.pool.clone());

    let club = repo
        .find_by_id(access.club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Club not found".to_string()))?;

    // The creator holds the club; removal would orphan it
    if target_user_id == club.created_by {
        return Err(ApiError::Validation(
            "The club creator cannot be removed".to_string(),
        ));
    }

    let rows_affected = repo.remove_member(access.club_id, target_user_id).await?;
    if rows_affected == 0 {
        return Err(ApiError::NotFound("Member not found".to_string()));
    }

    info!(
        club_id = %access.club_id,
        target_user_id = %target_user_id,
        removed_by = %user_auth.user_id,
        "Member removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Join a club by invite code.
///
/// POST /api/v1/clubs/join
pub async fn join_club(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<JoinClubRequest>,
) -> Result<(StatusCode, Json<JoinClubResponse>), ApiError> {
    request.validate()?;

    let club_repo = ClubRepository::new(state.pool.clone());
    let invite_repo = InviteRepository::new(state.pool.clone());

    let invite = invite_repo
        .find_redeemable_by_code(request.code.trim())
        .await?
        .ok_or_else(|| ApiError::NotFound("Invite not found or expired".to_string()))?;

    let club = club_repo
        .find_by_id(invite.club_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Club not found".to_string()))?;

    let membership = club_repo
        .add_member(invite.club_id, user_auth.user_id, ClubRoleDb::Member)
        .await?
        .ok_or_else(|| ApiError::Conflict("You are already a member of this club".to_string()))?;

    info!(
        club_id = %invite.club_id,
        user_id = %user_auth.user_id,
        invite_id = %invite.id,
        "Member joined via invite"
    );

    Ok((
        StatusCode::CREATED,
        Json(JoinClubResponse {
            club_id: club.id,
            club_name: club.name,
            role: membership.role.into(),
            joined_at: membership.joined_at,
        }),
    ))
}

/// Get club-level attendance statistics. Admins only.
///
/// GET /api/v1/clubs/:club_id/stats
pub async fn get_club_stats(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
) -> Result<Json<ClubStatsResponse>, ApiError> {
    let club_repo = ClubRepository::new(state.pool.clone());
    let session_repo = SessionRepository::new(state.pool.clone());
    let attendance_repo = AttendanceRepository::new(state.pool.clone());

    let member_count = club_repo.count_members(access.club_id).await?;
    let session_count = session_repo.count_for_club(access.club_id).await?;
    let counts = attendance_repo.status_counts_for_club(access.club_id).await?;

    Ok(Json(ClubStatsResponse {
        club_id: access.club_id,
        member_count,
        session_count,
        stats: AttendanceStats::from_counts(
            counts.present,
            counts.late,
            counts.absent,
            counts.excused,
        ),
    }))
}
