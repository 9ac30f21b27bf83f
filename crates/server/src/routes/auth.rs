use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use common::types::Message;
use service::auth::domain::{ChangePasswordInput, LoginInput, RegisterInput};
use service::mail::spawn_send;
use service::users::UserProfile;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiQuery, CurrentUser, AUTH_COOKIE};
use crate::state::ServerState;

#[derive(Debug, Serialize)]
pub struct RegisterOutput { pub user_id: i32 }

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VerifyQuery { pub token: String }

#[utoipa::path(
    post, path = "/auth/register", tag = "auth",
    request_body = crate::openapi::RegisterRequest,
    responses((status = 201, description = "Registered"), (status = 400, description = "Validation error or email already registered"))
)]
pub async fn register(
    State(state): State<ServerState>,
    headers: HeaderMap,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<(StatusCode, Json<RegisterOutput>), JsonApiError> {
    let user = state.auth.register(input).await?;

    // activation mail is best-effort and never fails the registration
    match state.auth.activation_email(&user, &state.base_url(&headers)) {
        Ok(email) => { spawn_send(state.mailer.clone(), email); }
        Err(e) => warn!(user_id = user.id, error = %e, "activation_email_not_built"),
    }
    Ok((StatusCode::CREATED, Json(RegisterOutput { user_id: user.id })))
}

#[utoipa::path(
    post, path = "/auth/login", tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in"), (status = 400, description = "Inactive user"), (status = 401, description = "Incorrect email or password"))
)]
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let mut cookie = Cookie::new(AUTH_COOKIE, session.access_token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    let out = LoginOutput {
        access_token: session.access_token,
        token_type: session.token_type,
        user: UserProfile::from(&session.user),
    };
    Ok((jar.add(cookie), Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Cookie cleared")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    (jar.remove(cookie), StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/auth/verify_email", tag = "auth",
    params(VerifyQuery),
    responses((status = 200, description = "Account activated"), (status = 400, description = "Token expired"), (status = 401, description = "Invalid token"))
)]
pub async fn verify_email(State(state): State<ServerState>, ApiQuery(q): ApiQuery<VerifyQuery>) -> Result<Json<Message>, JsonApiError> {
    let user = state.auth.verify_email(&q.token).await?;
    info!(user_id = user.id, "email_verified");
    Ok(Json(Message::new("Email verified")))
}

#[utoipa::path(
    put, path = "/auth/password", tag = "auth",
    request_body = crate::openapi::ChangePasswordRequest,
    responses((status = 204, description = "Password changed"), (status = 400, description = "New password too short"), (status = 401, description = "Wrong password")),
    security(("bearer" = []))
)]
pub async fn change_password(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<ChangePasswordInput>,
) -> Result<StatusCode, JsonApiError> {
    state.auth.change_password(user.id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
