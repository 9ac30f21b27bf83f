#![allow(dead_code)]
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use server::startup::build_app;
use server::state::ServerState;
use service::mail::MemoryMailer;

pub const SECRET: &str = "http-test-secret";

pub fn config() -> configs::AppConfig {
    let mut cfg = configs::AppConfig::default();
    cfg.auth.secret_key = SECRET.into();
    cfg.media.root = format!("target/test-data/http-{}", Uuid::new_v4());
    cfg.media.max_upload_bytes = 64 * 1024;
    cfg
}

pub struct TestApp {
    pub router: Router,
    pub mailer: Arc<MemoryMailer>,
    pub db: DatabaseConnection,
    pub cfg: configs::AppConfig,
}

impl Drop for TestApp {
    fn drop(&mut self) { let _ = std::fs::remove_dir_all(&self.cfg.media.root); }
}

pub fn app_with(db: DatabaseConnection) -> TestApp {
    let cfg = config();
    let mailer = Arc::new(MemoryMailer::default());
    let state = ServerState::new(db.clone(), &cfg, mailer.clone()).expect("state");
    TestApp { router: build_app(state, &cfg), mailer, db, cfg }
}

/// App over a connection that fails every query; enough for checks that run before the database.
pub fn offline_app() -> TestApp {
    app_with(DatabaseConnection::Disconnected)
}

/// App over a migrated database, or `None` when database tests are disabled or unreachable.
pub async fn db_app() -> Option<TestApp> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match models::db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(app_with(db))
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("infallible router")
    }

    pub async fn json(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (u16, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&b).expect("json")))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };
        let resp = self.send(req).await;
        let status = resp.status().as_u16();
        (status, body_json(resp).await)
    }

    /// Multipart request with one `file` part.
    pub async fn upload(&self, method: &str, uri: &str, token: &str, content_type: &str, bytes: &[u8]) -> (u16, Value) {
        let boundary = "----guidebook-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\n");
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .expect("request");
        let resp = self.send(req).await;
        let status = resp.status().as_u16();
        (status, body_json(resp).await)
    }

    /// Register, activate and log in; returns `(user_id, token, email)`.
    pub async fn active_user(&self, password: &str) -> (i32, String, String) {
        let email = format!("http-{}@example.com", Uuid::new_v4());
        let (status, body) = self
            .json("POST", "/auth/register", None, Some(serde_json::json!({
                "email": email, "first_name": "Test", "last_name": "User", "password": password
            })))
            .await;
        assert_eq!(status, 201, "register: {body}");
        let user_id = body["user_id"].as_i64().expect("user_id") as i32;
        models::user::set_active(&self.db, user_id, true).await.expect("activate");
        let (status, body) = self
            .json("POST", "/auth/login", None, Some(serde_json::json!({"email": email, "password": password})))
            .await;
        assert_eq!(status, 200, "login: {body}");
        (user_id, body["access_token"].as_str().expect("token").to_string(), email)
    }
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
