//! Role-based access control middleware for club routes.
//!
//! Provides middleware for requiring club membership and admin rights.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::club::ClubRole;
use persistence::repositories::ClubRepository;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::middleware::user_auth::UserAuth;

/// Club access information passed to handlers via request extensions.
#[derive(Debug, Clone)]
pub struct ClubAccess {
    /// The club ID extracted from the path.
    pub club_id: Uuid,
    /// The caller's effective role in the club.
    pub role: ClubRole,
}

/// Middleware that requires the user to be a member of the club.
///
/// Extracts the club_id from path parameters, resolves the caller's role
/// (club creators are implicit admins) and stores a [`ClubAccess`] in
/// request extensions.
///
/// Requires `UserAuth` to be present in request extensions (use after
/// `require_user_auth`).
pub async fn require_club_member(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    require_club_role_impl(state, req, next, ClubRole::Member).await
}

/// Middleware that requires the user to be an admin of the club.
///
/// Same resolution as [`require_club_member`], but rejects plain members
/// with 403.
pub async fn require_club_admin(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    require_club_role_impl(state, req, next, ClubRole::Admin).await
}

/// Internal implementation of role checking middleware.
async fn require_club_role_impl(
    state: AppState,
    mut req: Request<Body>,
    next: Next,
    min_role: ClubRole,
) -> Response {
    let user_auth = match req.extensions().get::<UserAuth>() {
        Some(auth) => auth.clone(),
        None => {
            tracing::warn!("RBAC middleware called without UserAuth in extensions");
            return unauthorized_response("Authentication required");
        }
    };

    let club_id = match extract_club_id_from_path(req.uri().path()) {
        Some(id) => id,
        None => {
            tracing::error!("Could not extract club_id from path: {}", req.uri().path());
            return not_found_response("Club not found");
        }
    };

    let repo = ClubRepository::new(state.pool.clone());

    let role = match repo.resolve_role(club_id, user_auth.user_id).await {
        Ok(Some(role_db)) => ClubRole::from(role_db),
        Ok(None) => {
            // Distinguish a missing club from a non-member caller
            match repo.find_by_id(club_id).await {
                Ok(Some(_)) => {
                    return forbidden_response("You are not a member of this club");
                }
                Ok(None) => {
                    return not_found_response("Club not found");
                }
                Err(e) => {
                    tracing::error!("Database error checking club: {}", e);
                    return internal_error_response("Failed to verify club membership");
                }
            }
        }
        Err(e) => {
            tracing::error!("Database error resolving club role: {}", e);
            return internal_error_response("Failed to verify club membership");
        }
    };

    if min_role == ClubRole::Admin && !role.can_manage_club() {
        return forbidden_response("Admin role required for this operation");
    }

    req.extensions_mut().insert(ClubAccess { club_id, role });

    next.run(req).await
}

/// Extract club_id from the request path.
/// Expects paths like /api/v1/clubs/:club_id/...
fn extract_club_id_from_path(path: &str) -> Option<Uuid> {
    let segments: Vec<&str> = path.split('/').collect();

    for (i, segment) in segments.iter().enumerate() {
        if *segment == "clubs" {
            if let Some(id_str) = segments.get(i + 1) {
                // "join" is a collection-level route, not a club_id
                if *id_str == "join" {
                    return None;
                }
                return Uuid::parse_str(id_str).ok();
            }
        }
    }

    None
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create not found response.
fn not_found_response(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}

/// Helper to create internal error response.
fn internal_error_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}
