//! Attendance routes: check-in, session rosters and admin amendments.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::attendance::{
    AttendanceRecordResponse, CheckInRequest, CheckInResponse, SessionRosterResponse,
    UpdateAttendanceRequest,
};
use domain::models::user::UserPublic;
use persistence::entities::AttendanceStatusDb;
use persistence::repositories::{AttendanceRepository, SessionRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::ClubAccess;
use crate::routes::sessions::find_club_session;
use crate::services::check_in::{CheckInError, CheckInService};

/// Record attendance from a scanned QR payload.
///
/// POST /api/v1/check-in
pub async fn check_in(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, ApiError> {
    let service = CheckInService::new(
        state.pool.clone(),
        state.config.attendance.late_threshold_minutes,
    );

    let result = service
        .check_in(user_auth.user_id, &request)
        .await
        .map_err(map_check_in_error)?;

    Ok(Json(CheckInResponse {
        session_id: result.session_id,
        status: result.status,
        checked_in_at: result.checked_in_at,
    }))
}

/// Get a session's attendance roster. Admins only.
///
/// GET /api/v1/clubs/:club_id/sessions/:session_id/attendance
pub async fn session_roster(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionRosterResponse>, ApiError> {
    let session_repo = SessionRepository::new(state.pool.clone());
    let attendance_repo = AttendanceRepository::new(state.pool.clone());

    let session = find_club_session(&session_repo, access.club_id, session_id).await?;

    let records = attendance_repo.list_for_session(session.id).await?;

    let data: Vec<AttendanceRecordResponse> = records
        .into_iter()
        .map(|r| AttendanceRecordResponse {
            id: r.id,
            user: UserPublic {
                id: r.user_id,
                display_name: r.display_name,
            },
            status: r.status.into(),
            checked_in_at: r.checked_in_at,
            note: r.note,
        })
        .collect();

    let count = data.len();
    Ok(Json(SessionRosterResponse {
        session_id: session.id,
        data,
        count,
    }))
}

/// Amend an existing attendance record. Admins only.
///
/// PATCH /api/v1/clubs/:club_id/sessions/:session_id/attendance/:user_id
///
/// Amendment never creates records; only a record produced by check-in can
/// be updated.
pub async fn update_attendance(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, session_id, target_user_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> Result<Json<AttendanceRecordResponse>, ApiError> {
    request.validate()?;

    let session_repo = SessionRepository::new(state.pool.clone());
    let attendance_repo = AttendanceRepository::new(state.pool.clone());

    let session = find_club_session(&session_repo, access.club_id, session_id).await?;

    let status_db: AttendanceStatusDb = request.status.into();
    let record = attendance_repo
        .update_status(session.id, target_user_id, status_db, request.note.as_deref())
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("No attendance record for this member".to_string())
        })?;

    let user_repo = persistence::repositories::UserRepository::new(state.pool.clone());
    let display_name = user_repo
        .find_by_id(target_user_id)
        .await?
        .map(|u| u.display_name)
        .unwrap_or_default();

    info!(
        session_id = %session.id,
        target_user_id = %target_user_id,
        status = %request.status,
        amended_by = %user_auth.user_id,
        "Attendance record amended"
    );

    Ok(Json(AttendanceRecordResponse {
        id: record.id,
        user: UserPublic {
            id: record.user_id,
            display_name,
        },
        status: record.status.into(),
        checked_in_at: record.checked_in_at,
        note: record.note,
    }))
}

fn map_check_in_error(err: CheckInError) -> ApiError {
    match err {
        CheckInError::InvalidPayload(e) => ApiError::InvalidPayload(e.to_string()),
        CheckInError::StaleTimestamp(msg) => ApiError::InvalidPayload(msg),
        CheckInError::SessionNotFound => ApiError::NotFound("Session not found".to_string()),
        CheckInError::NotMember => {
            ApiError::Forbidden("You are not a member of this club".to_string())
        }
        CheckInError::AlreadyCheckedIn => ApiError::AlreadyCheckedIn,
        CheckInError::WindowClosed => ApiError::WindowClosed,
        CheckInError::DatabaseError(db_err) => ApiError::from(db_err),
    }
}
