pub mod auth;
pub mod guides;
pub mod users;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::media::Upload;

use crate::errors::JsonApiError;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

/// Room for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// First multipart field named `file`.
pub async fn read_upload(multipart: Result<Multipart, MultipartRejection>) -> Result<Upload, JsonApiError> {
    let mut multipart = multipart?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| JsonApiError::bad_request(format!("Failed to read file: {}", e)))?;
            return Ok(Upload { file_name, content_type, bytes: bytes.to_vec() });
        }
    }
    Err(JsonApiError::bad_request("No file provided"))
}

/// Build the full application router: API routes, media files and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer, media_root: &str, max_upload_bytes: usize) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/verify_email", get(auth::verify_email))
        .route("/auth/password", put(auth::change_password));

    let user_routes = Router::new()
        .route("/users/me", get(users::me).put(users::update_me).delete(users::delete_me))
        .route("/users/me/details", get(users::my_details).put(users::update_my_details))
        .route("/users/me/avatar", put(users::upload_avatar).delete(users::delete_avatar))
        .route("/users/me/cover_image", put(users::upload_cover_image).delete(users::delete_cover_image))
        .route("/users/:user_id", get(users::get_user))
        .route("/professions", get(users::list_professions));

    // `/guides/:id` names a user on GET and a guide on PUT/DELETE
    let guide_routes = Router::new()
        .route("/guides", get(guides::list).post(guides::create))
        .route("/guides/search", get(guides::search))
        .route(
            "/guides/cover_image",
            get(guides::get_cover_image)
                .post(guides::create_cover_image)
                .put(guides::replace_cover_image)
                .delete(guides::delete_cover_image),
        )
        .route("/guides/guide/:guide_id", get(guides::get_guide))
        .route("/guides/:id", get(guides::list_by_user).put(guides::update).delete(guides::delete));

    Router::new()
        .route("/health", get(health))
        .merge(auth_routes)
        .merge(user_routes)
        .merge(guide_routes)
        .with_state(state)
        .nest_service("/media", ServeDir::new(media_root))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(max_upload_bytes + MULTIPART_OVERHEAD))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
