//! Router checks that resolve before any database access.

mod support;

use axum::body::Body;
use axum::http::{header, Request};
use jsonwebtoken::Algorithm;
use serde_json::json;
use service::auth::repository::mock::MockAuthRepository;
use service::auth::{AuthConfig, AuthService};
use std::sync::Arc;

use support::{body_json, offline_app, SECRET};

fn token_with(secret: &str, exp_minutes: i64) -> String {
    let svc = AuthService::new(Arc::new(MockAuthRepository::default()), AuthConfig::new(secret, Algorithm::HS256, exp_minutes)).unwrap();
    svc.create_token(1).unwrap().token
}

#[tokio::test]
async fn health_is_ok() {
    let app = offline_app();
    let (status, body) = app.json("GET", "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn missing_token_is_401_with_challenge() {
    let app = offline_app();
    let req = Request::builder().uri("/users/me").body(Body::empty()).unwrap();
    let resp = app.send(req).await;
    assert_eq!(resp.status().as_u16(), 401);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    let body = body_json(resp).await;
    assert_eq!(body["detail"], "Not authenticated");
}

#[tokio::test]
async fn tampered_token_is_401() {
    let app = offline_app();
    let forged = token_with("some-other-secret", 30);
    let (status, body) = app.json("GET", "/users/me", Some(&forged), None).await;
    assert_eq!(status, 401);
    assert_eq!(body["detail"], "Invalid authorization token. Try clearing your cookies and login again.");

    let (status, _) = app.json("GET", "/guides/guide/1", Some("not-a-jwt"), None).await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn expired_token_is_400() {
    let app = offline_app();
    let expired = token_with(SECRET, -5);
    let (status, body) = app.json("GET", "/users/me", Some(&expired), None).await;
    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Token expired");
}

#[tokio::test]
async fn expired_cookie_token_is_400() {
    let app = offline_app();
    let expired = token_with(SECRET, -5);
    let req = Request::builder()
        .uri("/users/me/details")
        .header(header::COOKIE, format!("auth_token={expired}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(req).await.status().as_u16(), 400);
}

#[tokio::test]
async fn registration_input_is_validated() {
    let app = offline_app();
    let (status, body) = app
        .json("POST", "/auth/register", None, Some(json!({
            "email": "not-an-email", "first_name": "A", "last_name": "B", "password": "long-enough"
        })))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Validation Error");

    let (status, _) = app
        .json("POST", "/auth/register", None, Some(json!({
            "email": "a@b.io", "first_name": "A", "last_name": "B", "password": "short"
        })))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn malformed_requests_use_the_error_body() {
    let app = offline_app();
    let req = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let resp = app.send(req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body = body_json(resp).await;
    assert_eq!(body["error"], "Invalid Request");
    assert!(body["detail"].is_string());

    let req = Request::builder().method("POST").uri("/auth/login").body(Body::from("{}")).unwrap();
    let resp = app.send(req).await;
    assert_eq!(resp.status().as_u16(), 415);
    assert_eq!(body_json(resp).await["error"], "Invalid Request");

    // wrong field type is a 422 from the JSON layer
    let (status, body) = app.json("POST", "/auth/login", None, Some(json!({"email": 5, "password": "x"}))).await;
    assert_eq!(status, 422);
    assert_eq!(body["error"], "Invalid Request");

    let (status, body) = app.json("GET", "/guides?page=abc", None, None).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invalid Request");
    let (status, body) = app.json("GET", "/auth/verify_email", None, None).await;
    assert_eq!(status, 400);
    assert!(body["detail"].as_str().unwrap().contains("token"));
}

#[tokio::test]
async fn paging_bounds_are_checked() {
    let app = offline_app();
    for uri in ["/guides?page=0", "/guides?page_size=0", "/guides?page_size=101", "/guides/search?title=x&page_size=500"] {
        let (status, _) = app.json("GET", uri, None, None).await;
        assert_eq!(status, 400, "{uri}");
    }
}

#[tokio::test]
async fn protected_guide_routes_need_a_token() {
    let app = offline_app();
    for (method, uri) in [
        ("POST", "/guides"),
        ("GET", "/guides/1"),
        ("PUT", "/guides/1"),
        ("DELETE", "/guides/1"),
        ("GET", "/guides/cover_image?guide_id=1"),
        ("DELETE", "/guides/cover_image?guide_id=1"),
        ("PUT", "/auth/password"),
    ] {
        let body = (method == "POST" || method == "PUT").then(|| json!({"title": "t", "content": "c", "old_password": "x", "new_password": "y"}));
        let (status, _) = app.json(method, uri, None, body).await;
        assert_eq!(status, 401, "{method} {uri}");
    }
}

#[tokio::test]
async fn logout_clears_cookie() {
    let app = offline_app();
    let req = Request::builder().method("POST").uri("/auth/logout").body(Body::empty()).unwrap();
    let resp = app.send(req).await;
    assert_eq!(resp.status().as_u16(), 204);
    let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("auth_token="));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = offline_app();
    let (status, body) = app.json("GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, 200);
    assert!(body["paths"]["/guides/search"].is_object());
}
