use serde::{Deserialize, Deserializer, Serialize};

use crate::auth::domain::AuthUser;
use models::{profession, user};

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

impl From<user::Model> for UserProfile {
    fn from(u: user::Model) -> Self {
        Self { user_id: u.id, email: u.email, first_name: u.first_name, last_name: u.last_name, is_active: u.is_active }
    }
}

impl From<&AuthUser> for UserProfile {
    fn from(u: &AuthUser) -> Self {
        Self {
            user_id: u.id,
            email: u.email.clone(),
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserUpdateInput {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionView {
    pub profession_id: i32,
    pub name: String,
}

impl From<profession::Model> for ProfessionView {
    fn from(p: profession::Model) -> Self { Self { profession_id: p.id, name: p.name } }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetailView {
    pub user_id: i32,
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub profession: Option<ProfessionView>,
    pub is_instructor: bool,
}

/// Partial update: absent fields keep their stored value.
///
/// `profession_id` distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`), which clears the profession.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDetailInput {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub profession_id: Option<Option<i32>>,
    #[serde(default)]
    pub is_instructor: Option<bool>,
}

/// Wraps any value that is present in the body, `null` included.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// The two images a profile carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileImage {
    Avatar,
    CoverImage,
}

impl ProfileImage {
    /// Storage folder for this image kind of `user_id`.
    pub fn folder(self, user_id: i32) -> String {
        match self {
            ProfileImage::Avatar => format!("users/{user_id}/avatar"),
            ProfileImage::CoverImage => format!("users/{user_id}/cover_image"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProfileImage::Avatar => "Avatar",
            ProfileImage::CoverImage => "Cover image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_folders_are_per_user_and_kind() {
        assert_eq!(ProfileImage::Avatar.folder(4), "users/4/avatar");
        assert_eq!(ProfileImage::CoverImage.folder(4), "users/4/cover_image");
        assert_eq!(ProfileImage::CoverImage.label(), "Cover image");
    }

    #[test]
    fn detail_input_fields_are_optional() {
        let input: UserDetailInput = serde_json::from_str(r#"{"bio":"hi"}"#).unwrap();
        assert_eq!(input.bio.as_deref(), Some("hi"));
        assert!(input.profession_id.is_none());
        assert!(input.is_instructor.is_none());
    }

    #[test]
    fn null_profession_is_not_an_absent_one() {
        let cleared: UserDetailInput = serde_json::from_str(r#"{"profession_id":null}"#).unwrap();
        assert_eq!(cleared.profession_id, Some(None));
        let set: UserDetailInput = serde_json::from_str(r#"{"profession_id":7}"#).unwrap();
        assert_eq!(set.profession_id, Some(Some(7)));
        let absent: UserDetailInput = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.profession_id, None);
    }

    #[test]
    fn profile_from_auth_user() {
        let au = AuthUser { id: 3, email: "a@b.io".into(), first_name: "A".into(), last_name: "B".into(), is_active: true, is_instructor: true };
        let p = UserProfile::from(&au);
        assert_eq!(p.user_id, 3);
        assert!(p.is_active);
    }
}
