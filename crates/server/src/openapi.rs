use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub first_name: String, pub last_name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub old_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct UserUpdateRequest { pub first_name: String, pub last_name: String }

#[derive(ToSchema)]
pub struct UserDetailRequest {
    pub bio: Option<String>,
    /// `null` clears the profession; omit to keep it
    pub profession_id: Option<i32>,
    pub is_instructor: Option<bool>,
}

#[derive(ToSchema)]
pub struct GuideRequest {
    pub title: String,
    pub content: String,
    pub note: Option<String>,
    pub published: bool,
}

/// Multipart body with a single `file` part.
#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::verify_email,
        crate::routes::auth::change_password,
        crate::routes::users::me,
        crate::routes::users::update_me,
        crate::routes::users::delete_me,
        crate::routes::users::get_user,
        crate::routes::users::my_details,
        crate::routes::users::update_my_details,
        crate::routes::users::upload_avatar,
        crate::routes::users::delete_avatar,
        crate::routes::users::upload_cover_image,
        crate::routes::users::delete_cover_image,
        crate::routes::users::list_professions,
        crate::routes::guides::list,
        crate::routes::guides::search,
        crate::routes::guides::list_by_user,
        crate::routes::guides::get_guide,
        crate::routes::guides::create,
        crate::routes::guides::update,
        crate::routes::guides::delete,
        crate::routes::guides::get_cover_image,
        crate::routes::guides::create_cover_image,
        crate::routes::guides::replace_cover_image,
        crate::routes::guides::delete_cover_image,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            UserUpdateRequest,
            UserDetailRequest,
            GuideRequest,
            UploadForm,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users"),
        (name = "guides")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_guide_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/guides"));
        assert!(doc.paths.paths.contains_key("/guides/cover_image"));
        assert!(doc.paths.paths.contains_key("/auth/verify_email"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
