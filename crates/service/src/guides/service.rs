use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{CoverImage, GuideDetail, GuideInput, GuidePage, GuideQuery, GuideRecord, SortOrder};
use super::repository::GuideRepository;
use crate::auth::domain::AuthUser;
use crate::errors::ServiceError;
use crate::media::{discard, store_image, MediaStore, Upload};
use crate::pagination::{page_count, PageRequest};
use crate::users::domain::UserProfile;

/// Application service encapsulating guide business rules:
/// publication visibility, instructor-only authoring and owner-only changes.
pub struct GuideService<R: GuideRepository> {
    repo: Arc<R>,
    media: Arc<dyn MediaStore>,
}

impl<R: GuideRepository> GuideService<R> {
    pub fn new(repo: Arc<R>, media: Arc<dyn MediaStore>) -> Self { Self { repo, media } }

    async fn fetch_page(&self, query: GuideQuery, page: PageRequest) -> Result<GuidePage, ServiceError> {
        let total = self.repo.count(&query).await?;
        if total == 0 {
            return Err(ServiceError::not_found("Guides"));
        }
        let pages = page_count(total, page.page_size);
        if page.page > pages {
            return Err(ServiceError::not_found("Page"));
        }
        let guides = self.repo.list(&query, page.offset(), page.page_size).await?;
        Ok(GuidePage { pages, guides })
    }

    /// Published guides, newest first by default.
    pub async fn list(&self, page: PageRequest, order: SortOrder) -> Result<GuidePage, ServiceError> {
        self.fetch_page(GuideQuery { published_only: true, order, ..Default::default() }, page).await
    }

    /// Published guides whose title contains `title`, ignoring case.
    pub async fn search(&self, title: &str, page: PageRequest) -> Result<GuidePage, ServiceError> {
        let query = GuideQuery { published_only: true, title: Some(title.trim().to_string()), ..Default::default() };
        self.fetch_page(query, page).await
    }

    /// Guides owned by `user_id`; drafts are included only for the owner.
    pub async fn list_by_user(&self, user_id: i32, page: PageRequest, viewer: &AuthUser) -> Result<GuidePage, ServiceError> {
        let query = GuideQuery { published_only: viewer.id != user_id, owner_id: Some(user_id), ..Default::default() };
        self.fetch_page(query, page).await
    }

    /// Guide the viewer may see; drafts of other users read as missing.
    async fn visible(&self, guide_id: i32, viewer: &AuthUser) -> Result<GuideRecord, ServiceError> {
        match self.repo.get(guide_id).await? {
            Some(record) if record.is_visible_to(viewer.id) => Ok(record),
            _ => Err(ServiceError::not_found("Guide")),
        }
    }

    fn ensure_owner(record: &GuideRecord, viewer: &AuthUser) -> Result<(), ServiceError> {
        if record.user_id != viewer.id {
            return Err(ServiceError::Unauthorized("Unauthorized".into()));
        }
        Ok(())
    }

    fn ensure_instructor(viewer: &AuthUser) -> Result<(), ServiceError> {
        if !viewer.is_instructor {
            return Err(ServiceError::Forbidden("User is not an instructor".into()));
        }
        Ok(())
    }

    async fn detail(&self, record: GuideRecord) -> Result<GuideDetail, ServiceError> {
        let author = self.repo.author(record.user_id).await?.ok_or_else(|| ServiceError::not_found("User"))?;
        Ok(GuideDetail::new(record, author))
    }

    pub async fn get(&self, guide_id: i32, viewer: &AuthUser) -> Result<GuideDetail, ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        self.detail(record).await
    }

    #[instrument(skip(self, viewer, input), fields(viewer = viewer.id))]
    pub async fn create(&self, viewer: &AuthUser, input: GuideInput) -> Result<GuideDetail, ServiceError> {
        Self::ensure_instructor(viewer)?;
        let input = input.prepared()?;
        let record = self.repo.insert(viewer.id, &input).await?;
        info!(guide_id = record.guide_id, published = record.published, "guide_created");
        Ok(GuideDetail::new(record, UserProfile::from(viewer)))
    }

    #[instrument(skip(self, viewer, input), fields(viewer = viewer.id))]
    pub async fn update(&self, guide_id: i32, viewer: &AuthUser, input: GuideInput) -> Result<GuideDetail, ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        Self::ensure_instructor(viewer)?;
        Self::ensure_owner(&record, viewer)?;
        let input = input.prepared()?;
        let record = self.repo.update(guide_id, &input).await?;
        info!(guide_id, "guide_updated");
        Ok(GuideDetail::new(record, UserProfile::from(viewer)))
    }

    #[instrument(skip(self, viewer), fields(viewer = viewer.id))]
    pub async fn delete(&self, guide_id: i32, viewer: &AuthUser) -> Result<(), ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        Self::ensure_owner(&record, viewer)?;
        if !self.repo.delete(guide_id).await? {
            return Err(ServiceError::not_found("Guide"));
        }
        discard(&self.media, record.cover_image.as_deref()).await;
        info!(guide_id, "guide_deleted");
        Ok(())
    }

    pub async fn cover_image(&self, guide_id: i32, viewer: &AuthUser) -> Result<CoverImage, ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        record
            .cover_image
            .map(|cover_image| CoverImage { cover_image })
            .ok_or_else(|| ServiceError::not_found("Cover image"))
    }

    /// Store an uploaded cover, replacing any previous file.
    #[instrument(skip(self, viewer, upload), fields(viewer = viewer.id, size = upload.bytes.len()))]
    pub async fn save_cover_image(&self, guide_id: i32, viewer: &AuthUser, upload: &Upload) -> Result<CoverImage, ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        Self::ensure_owner(&record, viewer)?;

        let path = store_image(self.media.as_ref(), &format!("guides/{guide_id}"), upload).await?;
        if let Err(e) = self.repo.set_cover_image(guide_id, Some(path.clone())).await {
            discard(&self.media, Some(path.as_str())).await;
            return Err(e);
        }
        discard(&self.media, record.cover_image.as_deref()).await;
        info!(guide_id, path = %path, "guide_cover_saved");
        Ok(CoverImage { cover_image: path })
    }

    #[instrument(skip(self, viewer), fields(viewer = viewer.id))]
    pub async fn delete_cover_image(&self, guide_id: i32, viewer: &AuthUser) -> Result<(), ServiceError> {
        let record = self.visible(guide_id, viewer).await?;
        Self::ensure_owner(&record, viewer)?;
        let Some(previous) = record.cover_image else {
            return Err(ServiceError::not_found("Cover image"));
        };
        self.repo.set_cover_image(guide_id, None).await?;
        discard(&self.media, Some(previous.as_str())).await;
        Ok(())
    }
}
