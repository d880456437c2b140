use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_club_admin,
    require_club_member, require_user_auth, security_headers_middleware, trace_id,
    RateLimiterState,
};
use crate::routes::{attendance, auth, clubs, health, invites, me, sessions};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Create rate limiter if rate limiting is enabled (rate_limit_per_minute > 0)
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Authenticated routes without a club scope.
    // Middleware order: auth runs first, then rate limiting (which is keyed by user)
    let user_routes = Router::new()
        .route("/api/v1/me", get(me::get_me))
        .route(
            "/api/v1/me/profile",
            get(me::get_profile).put(me::update_profile),
        )
        .route("/api/v1/me/attendance", get(me::get_my_attendance))
        .route(
            "/api/v1/clubs",
            post(clubs::create_club).get(clubs::list_clubs),
        )
        .route("/api/v1/clubs/join", post(clubs::join_club))
        .route("/api/v1/check-in", post(attendance::check_in))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Club routes open to every member of the club
    let member_routes = Router::new()
        .route("/api/v1/clubs/:club_id", get(clubs::get_club))
        .route("/api/v1/clubs/:club_id/members", get(clubs::list_members))
        .route(
            "/api/v1/clubs/:club_id/sessions",
            get(sessions::list_sessions),
        )
        .route(
            "/api/v1/clubs/:club_id/sessions/:session_id",
            get(sessions::get_session),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_club_member,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Club routes restricted to admins
    let admin_routes = Router::new()
        .route("/api/v1/clubs/:club_id", delete(clubs::delete_club))
        .route(
            "/api/v1/clubs/:club_id/members/:user_id/role",
            put(clubs::update_member_role),
        )
        .route(
            "/api/v1/clubs/:club_id/members/:user_id",
            delete(clubs::remove_member),
        )
        .route(
            "/api/v1/clubs/:club_id/invites",
            post(invites::regenerate_invite).get(invites::get_current_invite),
        )
        .route(
            "/api/v1/clubs/:club_id/sessions",
            post(sessions::create_session),
        )
        .route(
            "/api/v1/clubs/:club_id/sessions/:session_id/qr",
            post(sessions::issue_qr),
        )
        .route(
            "/api/v1/clubs/:club_id/sessions/:session_id/attendance",
            get(attendance::session_roster),
        )
        .route(
            "/api/v1/clubs/:club_id/sessions/:session_id/attendance/:user_id",
            patch(attendance::update_attendance),
        )
        .route("/api/v1/clubs/:club_id/stats", get(clubs::get_club_stats))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_club_admin,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler))
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/invites/:code", get(invites::get_invite_info));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(member_routes)
        .merge(admin_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware)) // Security headers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
