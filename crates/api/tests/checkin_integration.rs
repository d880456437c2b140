//! Integration tests for the QR check-in flow and attendance records.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_all_test_data, create_authenticated_user, create_test_club, create_test_pool,
    create_test_session, get_request_with_auth, issue_session_token, join_test_club,
    json_request_with_auth, parse_response_body, run_migrations, test_config, AuthenticatedUser,
    TestClub, TestUser,
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn check_in_body(session_id: &str, token: &str) -> Value {
    json!({
        "session": session_id,
        "token": token,
        "ts": chrono::Utc::now().to_rfc3339()
    })
}

async fn check_in(
    app: &axum::Router,
    auth: &AuthenticatedUser,
    body: Value,
) -> (StatusCode, Value) {
    let request = json_request_with_auth(Method::POST, "/api/v1/check-in", body, &auth.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let json = parse_response_body(response).await;
    (status, json)
}

// ============================================================================
// Check-in Outcomes
// ============================================================================

#[tokio::test]
async fn test_check_in_on_time_is_present() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    // Session started just now
    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "present");
    assert_eq!(body["session_id"], session.id);
    assert!(body["checked_in_at"].is_string());

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_before_start_is_present() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    // Session starts in an hour; early arrival still counts as present
    let session = create_test_session(&app, &owner, &club.id, 60, 180).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "present");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_past_threshold_is_late() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    // Started an hour ago; late threshold is 30 minutes
    let session = create_test_session(&app, &owner, &club.id, -60, 60).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["status"], "late");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_after_end_window_closed() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    // Session ended an hour ago
    let session = create_test_session(&app, &owner, &club.id, -180, -60).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::GONE, "body: {}", body);
    assert_eq!(body["error"], "window_closed");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_double_check_in_conflict() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, _) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already_checked_in");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_concurrent_check_ins_record_once() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let body = check_in_body(&session.id, &token);
    let (first, second) = tokio::join!(
        check_in(&app, &member, body.clone()),
        check_in(&app, &member, body.clone())
    );

    let statuses = [first.0, second.0];
    assert!(
        statuses.contains(&StatusCode::OK),
        "one scan should succeed: {:?}",
        statuses
    );

    // Exactly one attendance row regardless of interleaving
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance WHERE session_id = $1::uuid")
            .bind(&session.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    cleanup_all_test_data(&pool).await;
}

// ============================================================================
// Check-in Rejections
// ============================================================================

#[tokio::test]
async fn test_check_in_as_non_member_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let outsider = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let (status, _) = check_in(&app, &outsider, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_malformed_token_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;

    let (status, body) = check_in(&app, &member, check_in_body(&session.id, "too-short!")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_payload");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_future_timestamp_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;

    let body = json!({
        "session": session.id,
        "token": token,
        "ts": (chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339()
    });

    let (status, response) = check_in(&app, &member, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "invalid_payload");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_check_in_unknown_session_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let member = create_authenticated_user(&app, &TestUser::new()).await;

    let (status, _) = check_in(
        &app,
        &member,
        check_in_body(&uuid::Uuid::new_v4().to_string(), "AbCdEf123456"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}

// ============================================================================
// Roster and Amendments
// ============================================================================

#[tokio::test]
async fn test_session_roster_shows_check_ins() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;
    let (status, _) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let request = get_request_with_auth(
        &format!(
            "/api/v1/clubs/{}/sessions/{}/attendance",
            club.id, session.id
        ),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["user"]["id"], member.user_id);
    assert_eq!(body["data"][0]["status"], "present");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_member_cannot_view_roster() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;

    let request = get_request_with_auth(
        &format!(
            "/api/v1/clubs/{}/sessions/{}/attendance",
            club.id, session.id
        ),
        &member.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_admin_amends_record_to_excused() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let token = issue_session_token(&app, &owner, &club.id, &session.id).await;
    let (status, _) = check_in(&app, &member, check_in_body(&session.id, &token)).await;
    assert_eq!(status, StatusCode::OK);

    let request = json_request_with_auth(
        Method::PATCH,
        &format!(
            "/api/v1/clubs/{}/sessions/{}/attendance/{}",
            club.id, session.id, member.user_id
        ),
        json!({ "status": "excused", "note": "Doctor's appointment" }),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["status"], "excused");
    assert_eq!(body["note"], "Doctor's appointment");
    assert_eq!(body["user"]["id"], member.user_id);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_amendment_never_creates_records() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    let session = create_test_session(&app, &owner, &club.id, 0, 120).await;

    // Member never checked in
    let request = json_request_with_auth(
        Method::PATCH,
        &format!(
            "/api/v1/clubs/{}/sessions/{}/attendance/{}",
            club.id, session.id, member.user_id
        ),
        json!({ "status": "absent" }),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}

// ============================================================================
// Personal History and Club Stats
// ============================================================================

#[tokio::test]
async fn test_my_attendance_history_and_stats() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;
    join_test_club(&app, &member, &club.invite_code).await;

    // One on-time scan, one late scan
    let on_time = create_test_session(&app, &owner, &club.id, 0, 120).await;
    let late = create_test_session(&app, &owner, &club.id, -60, 60).await;
    let token_a = issue_session_token(&app, &owner, &club.id, &on_time.id).await;
    let token_b = issue_session_token(&app, &owner, &club.id, &late.id).await;

    let (status, _) = check_in(&app, &member, check_in_body(&on_time.id, &token_a)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = check_in(&app, &member, check_in_body(&late.id, &token_b)).await;
    assert_eq!(status, StatusCode::OK);

    let request = get_request_with_auth("/api/v1/me/attendance", &member.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["stats"]["present"], 1);
    assert_eq!(body["stats"]["late"], 1);
    assert_eq!(body["stats"]["attendance_rate"], 1.0);

    // Club-level stats aggregate the same scans
    let request = get_request_with_auth(
        &format!("/api/v1/clubs/{}/stats", club.id),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["session_count"], 2);
    assert_eq!(body["stats"]["present"], 1);
    assert_eq!(body["stats"]["late"], 1);

    cleanup_all_test_data(&pool).await;
}
