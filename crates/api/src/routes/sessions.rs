//! Session routes: creation, listing and the rotating QR payload.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::session::{
    CreateSessionRequest, ListSessionsResponse, QrPayloadResponse, SessionResponse, SessionSummary,
};
use domain::services::token;
use persistence::repositories::SessionRepository;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::ClubAccess;

/// Create a session with its initial check-in token. Admins only.
///
/// POST /api/v1/clubs/:club_id/sessions
pub async fn create_session(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    request.validate()?;

    let repo = SessionRepository::new(state.pool.clone());

    let issued = token::issue(Utc::now());
    let session = repo
        .create_session(
            access.club_id,
            request.title.trim(),
            request.location.as_deref(),
            request.starts_at,
            request.ends_at,
            &issued.token,
            issued.issued_at,
            user_auth.user_id,
        )
        .await?;

    info!(
        club_id = %access.club_id,
        session_id = %session.id,
        user_id = %user_auth.user_id,
        "Session created"
    );

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            id: session.id,
            club_id: session.club_id,
            title: session.title,
            location: session.location,
            starts_at: session.starts_at,
            ends_at: session.ends_at,
            created_by: session.created_by,
            created_at: session.created_at,
        }),
    ))
}

/// List a club's sessions with attendance counts. Members only.
///
/// GET /api/v1/clubs/:club_id/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
) -> Result<Json<ListSessionsResponse>, ApiError> {
    let repo = SessionRepository::new(state.pool.clone());

    let sessions = repo.list_for_club(access.club_id).await?;

    let data: Vec<SessionSummary> = sessions
        .into_iter()
        .map(|s| SessionSummary {
            id: s.id,
            title: s.title,
            location: s.location,
            starts_at: s.starts_at,
            ends_at: s.ends_at,
            attendance_count: s.attendance_count,
        })
        .collect();

    let count = data.len();
    Ok(Json(ListSessionsResponse { data, count }))
}

/// Get one session. Members only.
///
/// GET /api/v1/clubs/:club_id/sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SessionResponse>, ApiError> {
    let repo = SessionRepository::new(state.pool.clone());

    let session = find_club_session(&repo, access.club_id, session_id).await?;

    Ok(Json(SessionResponse {
        id: session.id,
        club_id: session.club_id,
        title: session.title,
        location: session.location,
        starts_at: session.starts_at,
        ends_at: session.ends_at,
        created_by: session.created_by,
        created_at: session.created_at,
    }))
}

/// Issue a fresh check-in token and QR payload for a session. Admins only.
///
/// POST /api/v1/clubs/:club_id/sessions/:session_id/qr
///
/// Rotation replaces the displayed QR code; previously scanned payloads are
/// still evaluated against the session window, not the token value.
pub async fn issue_qr(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Extension(access): Extension<ClubAccess>,
    Path((_club_id, session_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<QrPayloadResponse>, ApiError> {
    let repo = SessionRepository::new(state.pool.clone());

    let session = find_club_session(&repo, access.club_id, session_id).await?;

    let issued = token::issue(Utc::now());
    let session = repo
        .update_token(session.id, &issued.token, issued.issued_at)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    let url = token::check_in_url(
        &state.config.attendance.checkin_base_url,
        session.id,
        &session.current_token,
        session.token_issued_at,
    );

    info!(
        session_id = %session.id,
        user_id = %user_auth.user_id,
        "Session QR payload issued"
    );

    Ok(Json(QrPayloadResponse {
        url,
        token: session.current_token,
        issued_at: session.token_issued_at,
    }))
}

/// Fetch a session and verify it belongs to the gated club.
pub(crate) async fn find_club_session(
    repo: &SessionRepository,
    club_id: Uuid,
    session_id: Uuid,
) -> Result<persistence::entities::SessionEntity, ApiError> {
    let session = repo
        .find_by_id(session_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    if session.club_id != club_id {
        return Err(ApiError::NotFound("Session not found".to_string()));
    }

    Ok(session)
}
