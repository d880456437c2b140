//! Integration tests for club management: creation, membership, roles and stats.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use docker-compose.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    cleanup_all_test_data, create_authenticated_user, create_test_club, create_test_pool,
    delete_request_with_auth, get_request_with_auth, join_test_club, json_request_with_auth,
    parse_response_body, run_migrations, test_config, TestClub, TestUser,
};
use serde_json::json;
use tower::ServiceExt;

// ============================================================================
// Club Creation and Listing
// ============================================================================

#[tokio::test]
async fn test_create_club_makes_creator_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/clubs",
        json!({ "name": "Chess Club", "description": "Weekly games" }),
        &auth.access_token,
    );

    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = parse_response_body(response).await;
    assert_eq!(body["name"], "Chess Club");
    assert_eq!(body["your_role"], "admin");
    assert_eq!(body["created_by"], auth.user_id);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_create_club_empty_name_rejected() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/clubs",
        json!({ "name": "" }),
        &auth.access_token,
    );

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_list_clubs_only_shows_memberships() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let outsider = create_authenticated_user(&app, &TestUser::new()).await;

    create_test_club(&app, &owner, &TestClub::new()).await;

    let request = get_request_with_auth("/api/v1/clubs", &owner.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["member_count"], 1);
    assert_eq!(body["data"][0]["your_role"], "admin");

    let request = get_request_with_auth("/api/v1/clubs", &outsider.access_token);
    let response = app.oneshot(request).await.unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["count"], 0);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_get_club_detail() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let auth = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &auth, &TestClub::new()).await;

    let request = get_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &auth.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["id"], club.id);
    assert_eq!(body["member_count"], 1);
    assert_eq!(body["session_count"], 0);
    assert_eq!(body["your_role"], "admin");

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_get_club_as_non_member_forbidden() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let outsider = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let request =
        get_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &outsider.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_get_unknown_club_not_found() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let auth = create_authenticated_user(&app, &TestUser::new()).await;

    let request = get_request_with_auth(
        &format!("/api/v1/clubs/{}", uuid::Uuid::new_v4()),
        &auth.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}

// ============================================================================
// Membership Management
// ============================================================================

#[tokio::test]
async fn test_join_and_list_members() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request = get_request_with_auth(
        &format!("/api/v1/clubs/{}/members", club.id),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["pagination"]["total"], 2);
    let roles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["role"].as_str().unwrap())
        .collect();
    assert!(roles.contains(&"admin"));
    assert!(roles.contains(&"member"));

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_join_twice_conflict() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request = json_request_with_auth(
        Method::POST,
        "/api/v1/clubs/join",
        json!({ "code": club.invite_code }),
        &member.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_promote_member_to_admin() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/clubs/{}/members/{}/role", club.id, member.user_id),
        json!({ "role": "admin" }),
        &owner.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["role"], "admin");

    // Promoted member can now use admin endpoints
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/clubs/{}/invites", club.id),
        json!({}),
        &member.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_member_cannot_manage_roles() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/clubs/{}/members/{}/role", club.id, member.user_id),
        json!({ "role": "admin" }),
        &member.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_creator_role_cannot_be_changed() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let request = json_request_with_auth(
        Method::PUT,
        &format!("/api/v1/clubs/{}/members/{}/role", club.id, owner.user_id),
        json!({ "role": "member" }),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_remove_member() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request = delete_request_with_auth(
        &format!("/api/v1/clubs/{}/members/{}", club.id, member.user_id),
        &owner.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Removed member loses access
    let request = get_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &member.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_creator_cannot_be_removed() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let request = delete_request_with_auth(
        &format!("/api/v1/clubs/{}/members/{}", club.id, owner.user_id),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_creator_is_admin_without_membership_row() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    // The creator's role must derive from clubs.created_by alone, so drop
    // their membership row out from under them.
    sqlx::query("DELETE FROM club_members WHERE club_id = $1::uuid AND user_id = $2::uuid")
        .bind(&club.id)
        .bind(&owner.user_id)
        .execute(&pool)
        .await
        .unwrap();

    // Still passes the admin gate: session creation succeeds
    let starts_at = chrono::Utc::now() + chrono::Duration::hours(1);
    let request = json_request_with_auth(
        Method::POST,
        &format!("/api/v1/clubs/{}/sessions", club.id),
        json!({
            "title": "Board meeting",
            "starts_at": starts_at.to_rfc3339(),
            "ends_at": (starts_at + chrono::Duration::hours(1)).to_rfc3339()
        }),
        &owner.access_token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // And the club detail still reports them as admin
    let request = get_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &owner.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["your_role"], "admin");

    cleanup_all_test_data(&pool).await;
}

// ============================================================================
// Deactivation and Stats
// ============================================================================

#[tokio::test]
async fn test_delete_club() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let request =
        delete_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &owner.access_token);
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A deactivated club behaves as missing
    let request = get_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &owner.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_member_cannot_delete_club() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let member = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    join_test_club(&app, &member, &club.invite_code).await;

    let request =
        delete_request_with_auth(&format!("/api/v1/clubs/{}", club.id), &member.access_token);
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    cleanup_all_test_data(&pool).await;
}

#[tokio::test]
async fn test_club_stats_empty() {
    let pool = create_test_pool().await;
    run_migrations(&pool).await;
    cleanup_all_test_data(&pool).await;

    let app = common::create_test_app(test_config(), pool.clone());
    let owner = create_authenticated_user(&app, &TestUser::new()).await;
    let club = create_test_club(&app, &owner, &TestClub::new()).await;

    let request = get_request_with_auth(
        &format!("/api/v1/clubs/{}/stats", club.id),
        &owner.access_token,
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = parse_response_body(response).await;
    assert_eq!(body["member_count"], 1);
    assert_eq!(body["session_count"], 0);
    assert_eq!(body["stats"]["present"], 0);
    assert_eq!(body["stats"]["attendance_rate"], 0.0);

    cleanup_all_test_data(&pool).await;
}
