use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use service::guides::domain::{CoverImage, GuideDetail, GuideInput, GuidePage, SortOrder};
use service::pagination::{PageRequest, DEFAULT_PAGE_SIZE};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery, CurrentUser};
use crate::routes::read_upload;
use crate::state::ServerState;

fn default_page() -> u64 { 1 }
fn default_page_size() -> u64 { DEFAULT_PAGE_SIZE }

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    /// `asc` or `desc` by last modification
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub order: SortOrder,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub title: String,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CoverQuery { pub guide_id: i32 }

#[utoipa::path(
    get, path = "/guides", tag = "guides",
    params(ListQuery),
    responses((status = 200, description = "Page of published guides"), (status = 404, description = "Guides not found or page not found"))
)]
pub async fn list(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ListQuery>) -> Result<Json<GuidePage>, JsonApiError> {
    let page = PageRequest::new(q.page, q.page_size)?;
    Ok(Json(state.guides.list(page, q.order).await?))
}

#[utoipa::path(
    get, path = "/guides/search", tag = "guides",
    params(SearchQuery),
    responses((status = 200, description = "Matching published guides"), (status = 404, description = "Guides not found or page not found"))
)]
pub async fn search(State(state): State<ServerState>, ApiQuery(q): ApiQuery<SearchQuery>) -> Result<Json<GuidePage>, JsonApiError> {
    let page = PageRequest::new(q.page, q.page_size)?;
    Ok(Json(state.guides.search(&q.title, page).await?))
}

#[utoipa::path(
    get, path = "/guides/{user_id}", tag = "guides",
    params(("user_id" = i32, Path, description = "Owner id"), PageQuery),
    responses((status = 200, description = "Guides of one user"), (status = 404, description = "Guides not found or page not found")),
    security(("bearer" = []))
)]
pub async fn list_by_user(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiPath(user_id): ApiPath<i32>,
    ApiQuery(q): ApiQuery<PageQuery>,
) -> Result<Json<GuidePage>, JsonApiError> {
    let page = PageRequest::new(q.page, q.page_size)?;
    Ok(Json(state.guides.list_by_user(user_id, page, &viewer).await?))
}

#[utoipa::path(
    get, path = "/guides/guide/{guide_id}", tag = "guides",
    params(("guide_id" = i32, Path, description = "Guide id")),
    responses((status = 200, description = "Guide"), (status = 404, description = "Guide not found")),
    security(("bearer" = []))
)]
pub async fn get_guide(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiPath(guide_id): ApiPath<i32>,
) -> Result<Json<GuideDetail>, JsonApiError> {
    Ok(Json(state.guides.get(guide_id, &viewer).await?))
}

#[utoipa::path(
    post, path = "/guides", tag = "guides",
    request_body = crate::openapi::GuideRequest,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation error"), (status = 403, description = "User is not an instructor")),
    security(("bearer" = []))
)]
pub async fn create(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiJson(input): ApiJson<GuideInput>,
) -> Result<(StatusCode, Json<GuideDetail>), JsonApiError> {
    let created = state.guides.create(&viewer, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/guides/{guide_id}", tag = "guides",
    params(("guide_id" = i32, Path, description = "Guide id")),
    request_body = crate::openapi::GuideRequest,
    responses(
        (status = 201, description = "Updated"),
        (status = 401, description = "Not the owner"),
        (status = 403, description = "User is not an instructor"),
        (status = 404, description = "Guide not found")
    ),
    security(("bearer" = []))
)]
pub async fn update(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiPath(guide_id): ApiPath<i32>,
    ApiJson(input): ApiJson<GuideInput>,
) -> Result<(StatusCode, Json<GuideDetail>), JsonApiError> {
    let updated = state.guides.update(guide_id, &viewer, input).await?;
    Ok((StatusCode::CREATED, Json(updated)))
}

#[utoipa::path(
    delete, path = "/guides/{guide_id}", tag = "guides",
    params(("guide_id" = i32, Path, description = "Guide id")),
    responses((status = 204, description = "Deleted"), (status = 401, description = "Not the owner"), (status = 404, description = "Guide not found")),
    security(("bearer" = []))
)]
pub async fn delete(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiPath(guide_id): ApiPath<i32>,
) -> Result<StatusCode, JsonApiError> {
    state.guides.delete(guide_id, &viewer).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/guides/cover_image", tag = "guides",
    params(CoverQuery),
    responses((status = 200, description = "Stored cover path"), (status = 404, description = "Cover image not found")),
    security(("bearer" = []))
)]
pub async fn get_cover_image(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiQuery(q): ApiQuery<CoverQuery>,
) -> Result<Json<CoverImage>, JsonApiError> {
    Ok(Json(state.guides.cover_image(q.guide_id, &viewer).await?))
}

#[utoipa::path(
    post, path = "/guides/cover_image", tag = "guides",
    params(CoverQuery),
    request_body(content = crate::openapi::UploadForm, content_type = "multipart/form-data"),
    responses((status = 201, description = "Cover stored"), (status = 400, description = "Not an accepted image"), (status = 401, description = "Not the owner")),
    security(("bearer" = []))
)]
pub async fn create_cover_image(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiQuery(q): ApiQuery<CoverQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CoverImage>), JsonApiError> {
    let upload = read_upload(multipart).await?;
    let cover = state.guides.save_cover_image(q.guide_id, &viewer, &upload).await?;
    Ok((StatusCode::CREATED, Json(cover)))
}

#[utoipa::path(
    put, path = "/guides/cover_image", tag = "guides",
    params(CoverQuery),
    request_body(content = crate::openapi::UploadForm, content_type = "multipart/form-data"),
    responses((status = 200, description = "Cover replaced"), (status = 400, description = "Not an accepted image"), (status = 401, description = "Not the owner")),
    security(("bearer" = []))
)]
pub async fn replace_cover_image(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiQuery(q): ApiQuery<CoverQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CoverImage>, JsonApiError> {
    let upload = read_upload(multipart).await?;
    Ok(Json(state.guides.save_cover_image(q.guide_id, &viewer, &upload).await?))
}

#[utoipa::path(
    delete, path = "/guides/cover_image", tag = "guides",
    params(CoverQuery),
    responses((status = 204, description = "Cover removed"), (status = 404, description = "Cover image not found")),
    security(("bearer" = []))
)]
pub async fn delete_cover_image(
    State(state): State<ServerState>,
    CurrentUser(viewer): CurrentUser,
    ApiQuery(q): ApiQuery<CoverQuery>,
) -> Result<StatusCode, JsonApiError> {
    state.guides.delete_cover_image(q.guide_id, &viewer).await?;
    Ok(StatusCode::NO_CONTENT)
}
