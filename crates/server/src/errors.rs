use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::auth::errors::AuthError;
use service::errors::ServiceError;

pub const INVALID_TOKEN_DETAIL: &str = "Invalid authorization token. Try clearing your cookies and login again.";

/// Error response rendered as `{"error": ..., "detail": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: String,
    pub detail: Option<String>,
    bearer_challenge: bool,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &str, detail: Option<String>) -> Self {
        Self { status, error: error.to_string(), detail, bearer_challenge: false }
    }

    /// Adds `WWW-Authenticate: Bearer` to the response.
    pub fn with_bearer_challenge(mut self) -> Self {
        self.bearer_challenge = true;
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Bad Request", Some(detail.into()))
    }

    pub fn not_authenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some("Not authenticated".into())).with_bearer_challenge()
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, error = %self.error, detail = ?self.detail, "request failed");
        }
        let body = Json(serde_json::json!({"error": self.error, "detail": self.detail}));
        let mut resp = (self.status, body).into_response();
        if self.bearer_challenge {
            resp.headers_mut().insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+ $(,)?) => {
        $(
            impl From<$rejection> for JsonApiError {
                fn from(r: $rejection) -> Self {
                    Self::new(r.status(), "Invalid Request", Some(r.body_text()))
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Unauthorized(msg) => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(msg)),
            ServiceError::Forbidden(msg) => Self::new(StatusCode::FORBIDDEN, "Forbidden", Some(msg)),
            ServiceError::Db(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Database Error", Some(msg)),
            ServiceError::Storage(msg) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Storage Error", Some(msg)),
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        let detail = Some(e.to_string());
        match e {
            AuthError::Validation(msg) => Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            AuthError::Conflict | AuthError::Inactive | AuthError::TokenExpired => {
                Self::new(StatusCode::BAD_REQUEST, "Bad Request", detail)
            }
            AuthError::NotFound => Self::new(StatusCode::NOT_FOUND, "Not Found", detail),
            AuthError::BadCredentials | AuthError::Unauthorized => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail).with_bearer_challenge()
            }
            AuthError::WrongPassword => Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", detail),
            AuthError::InvalidToken => {
                Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(INVALID_TOKEN_DETAIL.into())).with_bearer_challenge()
            }
            AuthError::HashError(_) | AuthError::TokenError(_) | AuthError::Repository(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Error", detail)
            }
        }
    }
}
