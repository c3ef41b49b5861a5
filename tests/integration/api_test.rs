//! Routing, authentication, and validation behavior of the HTTP API.

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_returns_ok_envelope() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["data"]["status"], "ok");
    assert!(
        response.body["data"]["version"]
            .as_str()
            .is_some_and(|v| !v.is_empty())
    );
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/does-not-exist", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_method_returns_405() {
    let app = TestApp::new();

    let response = app.request("DELETE", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_protected_routes_require_auth() {
    let app = TestApp::new();

    for path in [
        "/api/reminders",
        "/api/auth/me",
        "/api/users/me",
        "/api/users/me/notifications",
    ] {
        let response = app.request("GET", path, None, None).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "path: {path}");
        assert_eq!(response.body["error"], "UNAUTHORIZED", "path: {path}");
    }
}

#[tokio::test]
async fn test_malformed_bearer_token_rejected() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/me", None, Some("not.a.jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_non_bearer_scheme_rejected() {
    let app = TestApp::new();

    let req = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .expect("build request");

    let response = app.router.clone().oneshot(req).await.expect("send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rejects_garbage_token() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/refresh",
            Some(json!({ "refresh_token": "garbage" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "not-an-email", "password": "long-enough-1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_register_rejects_short_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/register",
            Some(json!({ "email": "ada@example.com", "password": "short" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_body_rejected() {
    let app = TestApp::new();

    let response = app.request("POST", "/api/auth/login", None, None).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oauth_unknown_provider_rejected() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/oauth/gitlab/authorize", None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_oauth_unconfigured_provider_rejected() {
    let app = TestApp::new();

    // Google has no client credentials in the test config.
    let response = app
        .request("GET", "/api/auth/oauth/google/authorize", None, None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oauth_authorize_url_for_configured_provider() {
    let app = TestApp::new();

    let response = app
        .request(
            "GET",
            "/api/auth/oauth/github/authorize?state=my-csrf-state",
            None,
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "my-csrf-state");

    let url = response.body["data"]["authorize_url"]
        .as_str()
        .expect("authorize_url present");
    assert!(url.starts_with("https://github.com/login/oauth/authorize"));
    assert!(url.contains("client_id=test-client-id"));
    assert!(url.contains("state=my-csrf-state"));
}

#[tokio::test]
async fn test_oauth_authorize_generates_state_when_missing() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/api/auth/oauth/github/authorize", None, None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.body["data"]["state"]
            .as_str()
            .is_some_and(|s| !s.is_empty())
    );
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let app = TestApp::new();

    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/reminders")
        .header("Origin", "https://app.example.com")
        .header("Access-Control-Request-Method", "POST")
        .body(Body::empty())
        .expect("build request");

    let response = app.router.clone().oneshot(req).await.expect("send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
