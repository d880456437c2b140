//! Routes for the authenticated user's own account, profile and history.

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::attendance::{AttendanceStats, UserAttendanceEntry, UserAttendanceResponse};
use domain::models::profile::UpdateProfileRequest;
use domain::models::{Profile, User};
use persistence::repositories::{AttendanceRepository, ProfileRepository, UserRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Response for the caller's account info.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: User,
}

/// Get the caller's account.
///
/// GET /api/v1/me
pub async fn get_me(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<MeResponse>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());

    let user = repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse { user: user.into() }))
}

/// Get the caller's profile.
///
/// GET /api/v1/me/profile
pub async fn get_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Profile>, ApiError> {
    let repo = ProfileRepository::new(state.pool.clone());

    let profile = repo
        .find_by_user_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not set".to_string()))?;

    Ok(Json(profile.into()))
}

/// Create or update the caller's profile.
///
/// PUT /api/v1/me/profile
pub async fn update_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;

    let repo = ProfileRepository::new(state.pool.clone());

    let profile = repo
        .upsert(
            user_auth.user_id,
            request.full_name.as_deref(),
            request.school.as_deref(),
            request.department.as_deref(),
        )
        .await?;

    info!(user_id = %user_auth.user_id, "Profile updated");

    Ok(Json(profile.into()))
}

/// Get the caller's attendance history with aggregate stats.
///
/// GET /api/v1/me/attendance
pub async fn get_my_attendance(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UserAttendanceResponse>, ApiError> {
    let repo = AttendanceRepository::new(state.pool.clone());

    let rows = repo.list_for_user(user_auth.user_id).await?;
    let counts = repo.status_counts_for_user(user_auth.user_id).await?;

    let data: Vec<UserAttendanceEntry> = rows
        .into_iter()
        .map(|r| UserAttendanceEntry {
            session_id: r.session_id,
            session_title: r.session_title,
            club_id: r.club_id,
            club_name: r.club_name,
            status: r.status.into(),
            checked_in_at: r.checked_in_at,
        })
        .collect();

    Ok(Json(UserAttendanceResponse {
        data,
        stats: AttendanceStats::from_counts(
            counts.present,
            counts.late,
            counts.absent,
            counts.excused,
        ),
    }))
}
