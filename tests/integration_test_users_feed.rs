mod common;

use axum::http::StatusCode;
use common::{body_json, TestApp};
use serde_json::json;

#[tokio::test]
async fn test_admin_feed_contains_users_and_invitations() {
    let app = TestApp::new().await;
    app.seed_user("admin@banana.co", "pw", Some("admin")).await;
    app.seed_user("emp@banana.co", "pw", Some("employee")).await;
    let auth = app.login("admin@banana.co", "pw").await;

    app.send_json(
        "POST",
        "/api/v1/invitations",
        &json!({ "email": "new@banana.co", "role": "manager" }),
        Some(&auth),
    ).await;

    let response = app.get("/api/v1/users", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let feed = body_json(response).await;

    let users = feed["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    let admin = users.iter().find(|u| u["email"] == "admin@banana.co").unwrap();
    assert_eq!(admin["roles"], json!(["admin"]));

    let invitations = feed["invitations"].as_array().unwrap();
    assert_eq!(invitations.len(), 1);
    assert_eq!(invitations[0]["email"], "new@banana.co");
    assert_eq!(invitations[0]["role"], "manager");
    assert!(invitations[0]["date"].is_string());
    // The token never leaves the store through the feed.
    assert!(invitations[0].get("token").is_none());
}

#[tokio::test]
async fn test_non_admin_feed_is_empty() {
    let app = TestApp::new().await;
    app.seed_user("admin@banana.co", "pw", Some("admin")).await;
    app.seed_user("mgr@banana.co", "pw", Some("manager")).await;
    let admin_auth = app.login("admin@banana.co", "pw").await;
    let mgr_auth = app.login("mgr@banana.co", "pw").await;

    app.send_json(
        "POST",
        "/api/v1/invitations",
        &json!({ "email": "new@banana.co", "role": "employee" }),
        Some(&admin_auth),
    ).await;

    let response = app.get("/api/v1/users", Some(&mgr_auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let feed = body_json(response).await;
    assert!(feed["users"].as_array().unwrap().is_empty());
    assert!(feed["invitations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_users_feed_requires_authentication() {
    let app = TestApp::new().await;
    let response = app.get("/api/v1/users", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_set_role_on_user() {
    let app = TestApp::new().await;
    app.seed_user("admin@banana.co", "pw", Some("admin")).await;
    let user_id = app.seed_user("emp@banana.co", "pw", Some("employee")).await;
    let auth = app.login("admin@banana.co", "pw").await;

    let response = app.send_json(
        "PUT",
        &format!("/api/v1/users/{}/role", user_id),
        &json!({ "role": "manager" }),
        Some(&auth),
    ).await;
    assert_eq!(response.status(), StatusCode::OK);

    let roles = app.state.user_repo.roles_for_user(&user_id).await.unwrap();
    assert_eq!(roles, vec!["manager".to_string()]);
}

#[tokio::test]
async fn test_set_role_rejects_unknown_role_and_user() {
    let app = TestApp::new().await;
    app.seed_user("admin@banana.co", "pw", Some("admin")).await;
    let user_id = app.seed_user("emp@banana.co", "pw", Some("employee")).await;
    let auth = app.login("admin@banana.co", "pw").await;

    let response = app.send_json(
        "PUT",
        &format!("/api/v1/users/{}/role", user_id),
        &json!({ "role": "superuser" }),
        Some(&auth),
    ).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send_json(
        "PUT",
        "/api/v1/users/no-such-user/role",
        &json!({ "role": "manager" }),
        Some(&auth),
    ).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_role_requires_admin() {
    let app = TestApp::new().await;
    let user_id = app.seed_user("emp@banana.co", "pw", Some("employee")).await;
    let auth = app.login("emp@banana.co", "pw").await;

    let response = app.send_json(
        "PUT",
        &format!("/api/v1/users/{}/role", user_id),
        &json!({ "role": "admin" }),
        Some(&auth),
    ).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
