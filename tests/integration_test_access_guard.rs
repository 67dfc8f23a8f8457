mod common;

use axum::http::{header, StatusCode};
use common::TestApp;

fn location(response: &axum::http::Response<axum::body::Body>) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_anonymous_is_redirected_to_login() {
    let app = TestApp::new().await;

    for path in ["/users", "/managers", "/employees"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {}", path);
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_admin_is_never_redirected() {
    let app = TestApp::new().await;
    app.seed_user("admin@banana.co", "pw", Some("admin")).await;
    let auth = app.login("admin@banana.co", "pw").await;

    for path in ["/users", "/managers", "/employees"] {
        let response = app.get(path, Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
    }
}

#[tokio::test]
async fn test_manager_on_admin_route_is_redirected_to_managers() {
    let app = TestApp::new().await;
    app.seed_user("mgr@banana.co", "pw", Some("manager")).await;
    let auth = app.login("mgr@banana.co", "pw").await;

    let response = app.get("/users", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/managers");

    let response = app.get("/managers", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_employee_is_redirected_to_employees() {
    let app = TestApp::new().await;
    app.seed_user("emp@banana.co", "pw", Some("employee")).await;
    let auth = app.login("emp@banana.co", "pw").await;

    let response = app.get("/users", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employees");

    let response = app.get("/managers", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/employees");

    let response = app.get("/employees", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

// A user holding none of the known roles falls through every check: there is
// no default route to send them to, so no redirect happens.
#[tokio::test]
async fn test_unrecognized_role_falls_through() {
    let app = TestApp::new().await;
    app.seed_user("ghost@banana.co", "pw", Some("ghost")).await;
    let auth = app.login("ghost@banana.co", "pw").await;

    for path in ["/users", "/managers", "/employees"] {
        let response = app.get(path, Some(&auth)).await;
        assert_eq!(response.status(), StatusCode::OK, "path {}", path);
    }
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = TestApp::new().await;
    let response = app.get("/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new().await;

    let auth = common::AuthHeaders {
        access_token: "garbage".to_string(),
        csrf_token: String::new(),
    };
    let response = app.get("/users", Some(&auth)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}
