use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use service::users::{service as users, ProfessionView, ProfileImage, UserDetailInput, UserDetailView, UserProfile, UserUpdateInput};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, CurrentUser, AUTH_COOKIE};
use crate::routes::read_upload;
use crate::state::ServerState;

#[utoipa::path(get, path = "/users/me", tag = "users", responses((status = 200, description = "Own profile")), security(("bearer" = [])))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&user))
}

#[utoipa::path(
    put, path = "/users/me", tag = "users",
    request_body = crate::openapi::UserUpdateRequest,
    responses((status = 200, description = "Updated profile"), (status = 400, description = "Validation error")),
    security(("bearer" = []))
)]
pub async fn update_me(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<UserUpdateInput>,
) -> Result<Json<UserProfile>, JsonApiError> {
    Ok(Json(users::update_user_profile(&state.db, user.id, input).await?))
}

#[utoipa::path(delete, path = "/users/me", tag = "users", responses((status = 204, description = "Account deleted")), security(("bearer" = [])))]
pub async fn delete_me(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, StatusCode), JsonApiError> {
    users::delete_user_profile(&state.db, &state.media, user.id).await?;
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    Ok((jar.remove(cookie), StatusCode::NO_CONTENT))
}

#[utoipa::path(
    get, path = "/users/{user_id}", tag = "users",
    params(("user_id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Profile"), (status = 404, description = "User not found")),
    security(("bearer" = []))
)]
pub async fn get_user(
    State(state): State<ServerState>,
    CurrentUser(_viewer): CurrentUser,
    ApiPath(user_id): ApiPath<i32>,
) -> Result<Json<UserProfile>, JsonApiError> {
    Ok(Json(users::get_user_profile_by_id(&state.db, user_id).await?))
}

#[utoipa::path(get, path = "/users/me/details", tag = "users", responses((status = 200, description = "Profile details")), security(("bearer" = [])))]
pub async fn my_details(State(state): State<ServerState>, CurrentUser(user): CurrentUser) -> Result<Json<UserDetailView>, JsonApiError> {
    Ok(Json(users::get_user_detail(&state.db, user.id).await?))
}

#[utoipa::path(
    put, path = "/users/me/details", tag = "users",
    request_body = crate::openapi::UserDetailRequest,
    responses((status = 200, description = "Updated details"), (status = 404, description = "Profession not found")),
    security(("bearer" = []))
)]
pub async fn update_my_details(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    ApiJson(input): ApiJson<UserDetailInput>,
) -> Result<Json<UserDetailView>, JsonApiError> {
    Ok(Json(users::update_user_detail(&state.db, user.id, input).await?))
}

async fn upload_image(state: ServerState, user_id: i32, kind: ProfileImage, multipart: Result<Multipart, MultipartRejection>) -> Result<Json<UserDetailView>, JsonApiError> {
    let upload = read_upload(multipart).await?;
    Ok(Json(users::set_profile_image(&state.db, &state.media, user_id, kind, &upload).await?))
}

#[utoipa::path(
    put, path = "/users/me/avatar", tag = "users",
    request_body(content = crate::openapi::UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Avatar stored"), (status = 400, description = "Not an accepted image")),
    security(("bearer" = []))
)]
pub async fn upload_avatar(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserDetailView>, JsonApiError> {
    upload_image(state, user.id, ProfileImage::Avatar, multipart).await
}

#[utoipa::path(delete, path = "/users/me/avatar", tag = "users", responses((status = 204, description = "Avatar removed"), (status = 404, description = "Avatar not found")), security(("bearer" = [])))]
pub async fn delete_avatar(State(state): State<ServerState>, CurrentUser(user): CurrentUser) -> Result<StatusCode, JsonApiError> {
    users::delete_profile_image(&state.db, &state.media, user.id, ProfileImage::Avatar).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put, path = "/users/me/cover_image", tag = "users",
    request_body(content = crate::openapi::UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Cover image stored"), (status = 400, description = "Not an accepted image")),
    security(("bearer" = []))
)]
pub async fn upload_cover_image(
    State(state): State<ServerState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UserDetailView>, JsonApiError> {
    upload_image(state, user.id, ProfileImage::CoverImage, multipart).await
}

#[utoipa::path(delete, path = "/users/me/cover_image", tag = "users", responses((status = 204, description = "Cover image removed"), (status = 404, description = "Cover image not found")), security(("bearer" = [])))]
pub async fn delete_cover_image(State(state): State<ServerState>, CurrentUser(user): CurrentUser) -> Result<StatusCode, JsonApiError> {
    users::delete_profile_image(&state.db, &state.media, user.id, ProfileImage::CoverImage).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/professions", tag = "users", responses((status = 200, description = "All professions by name")))]
pub async fn list_professions(State(state): State<ServerState>) -> Result<Json<Vec<ProfessionView>>, JsonApiError> {
    Ok(Json(users::list_professions(&state.db).await?))
}
