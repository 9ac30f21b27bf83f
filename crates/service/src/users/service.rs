use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument};

use models::{guide, profession, user, user_detail};
use crate::errors::ServiceError;
use crate::media::{discard, store_image, MediaStore, Upload};
use super::domain::{ProfessionView, ProfileImage, UserDetailInput, UserDetailView, UserProfile, UserUpdateInput};

async fn find_user(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))
}

async fn detail_view(db: &DatabaseConnection, user_id: i32, detail: user_detail::Model) -> Result<UserDetailView, ServiceError> {
    let profession = match detail.profession_id {
        Some(id) => profession::Entity::find_by_id(id).one(db).await?.map(ProfessionView::from),
        None => None,
    };
    Ok(UserDetailView {
        user_id,
        bio: detail.bio,
        avatar: detail.avatar,
        cover_image: detail.cover_image,
        profession,
        is_instructor: detail.is_instructor,
    })
}

/// Get a user's public profile.
pub async fn get_user_profile_by_id(db: &DatabaseConnection, user_id: i32) -> Result<UserProfile, ServiceError> {
    Ok(find_user(db, user_id).await?.into())
}

/// Update first and last name.
#[instrument(skip(db, input))]
pub async fn update_user_profile(db: &DatabaseConnection, user_id: i32, input: UserUpdateInput) -> Result<UserProfile, ServiceError> {
    let updated = user::update_names(db, user_id, &input.first_name, &input.last_name).await?;
    info!(user_id, "profile_updated");
    Ok(updated.into())
}

/// Delete the account; detail and guides follow through the FK cascade, stored images are removed afterwards.
#[instrument(skip(db, media))]
pub async fn delete_user_profile(db: &DatabaseConnection, media: &Arc<dyn MediaStore>, user_id: i32) -> Result<(), ServiceError> {
    let mut files: Vec<String> = Vec::new();
    if let Some(detail) = user_detail::find_by_user(db, user_id).await? {
        files.extend(detail.avatar);
        files.extend(detail.cover_image);
    }
    let guides = guide::Entity::find()
        .filter(guide::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    files.extend(guides.into_iter().filter_map(|g| g.cover_image));

    if !user::delete(db, user_id).await? {
        return Err(ServiceError::not_found("User"));
    }
    for path in &files {
        discard(media, Some(path.as_str())).await;
    }
    info!(user_id, removed_files = files.len(), "user_deleted");
    Ok(())
}

/// Profile details; the row is created on first access.
pub async fn get_user_detail(db: &DatabaseConnection, user_id: i32) -> Result<UserDetailView, ServiceError> {
    find_user(db, user_id).await?;
    let detail = user_detail::get_or_create(db, user_id).await?;
    detail_view(db, user_id, detail).await
}

#[instrument(skip(db, input))]
pub async fn update_user_detail(db: &DatabaseConnection, user_id: i32, input: UserDetailInput) -> Result<UserDetailView, ServiceError> {
    find_user(db, user_id).await?;
    let detail = user_detail::get_or_create(db, user_id).await?;
    let mut am: user_detail::ActiveModel = detail.into();

    if let Some(bio) = input.bio {
        user_detail::validate_bio(&bio)?;
        let bio = bio.trim();
        am.bio = Set((!bio.is_empty()).then(|| bio.to_string()));
    }
    match input.profession_id {
        Some(Some(profession_id)) => {
            profession::Entity::find_by_id(profession_id)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Profession"))?;
            am.profession_id = Set(Some(profession_id));
        }
        Some(None) => am.profession_id = Set(None),
        None => {}
    }
    if let Some(is_instructor) = input.is_instructor {
        am.is_instructor = Set(is_instructor);
    }
    let updated = am.update(db).await?;
    info!(user_id, "user_detail_updated");
    detail_view(db, user_id, updated).await
}

fn stored_image(detail: &user_detail::Model, kind: ProfileImage) -> Option<String> {
    match kind {
        ProfileImage::Avatar => detail.avatar.clone(),
        ProfileImage::CoverImage => detail.cover_image.clone(),
    }
}

fn set_image(am: &mut user_detail::ActiveModel, kind: ProfileImage, path: Option<String>) {
    match kind {
        ProfileImage::Avatar => am.avatar = Set(path),
        ProfileImage::CoverImage => am.cover_image = Set(path),
    }
}

/// Store a new avatar or cover image, replacing the previous file.
#[instrument(skip(db, media, upload), fields(size = upload.bytes.len()))]
pub async fn set_profile_image(
    db: &DatabaseConnection,
    media: &Arc<dyn MediaStore>,
    user_id: i32,
    kind: ProfileImage,
    upload: &Upload,
) -> Result<UserDetailView, ServiceError> {
    find_user(db, user_id).await?;
    let detail = user_detail::get_or_create(db, user_id).await?;
    let previous = stored_image(&detail, kind);

    let path = store_image(media.as_ref(), &kind.folder(user_id), upload).await?;
    let mut am: user_detail::ActiveModel = detail.into();
    set_image(&mut am, kind, Some(path.clone()));
    let updated = match am.update(db).await {
        Ok(updated) => updated,
        Err(e) => {
            discard(media, Some(path.as_str())).await;
            return Err(e.into());
        }
    };
    discard(media, previous.as_deref()).await;
    info!(user_id, path = %path, kind = kind.label(), "profile_image_saved");
    detail_view(db, user_id, updated).await
}

#[instrument(skip(db, media))]
pub async fn delete_profile_image(
    db: &DatabaseConnection,
    media: &Arc<dyn MediaStore>,
    user_id: i32,
    kind: ProfileImage,
) -> Result<(), ServiceError> {
    let detail = user_detail::find_by_user(db, user_id).await?;
    let Some(detail) = detail else { return Err(ServiceError::not_found(kind.label())) };
    let Some(previous) = stored_image(&detail, kind) else { return Err(ServiceError::not_found(kind.label())) };

    let mut am: user_detail::ActiveModel = detail.into();
    set_image(&mut am, kind, None);
    am.update(db).await?;
    discard(media, Some(previous.as_str())).await;
    Ok(())
}

pub async fn list_professions(db: &DatabaseConnection) -> Result<Vec<ProfessionView>, ServiceError> {
    Ok(profession::list(db).await?.into_iter().map(ProfessionView::from).collect())
}
