use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use crate::errors::ServiceError;
use crate::guides::domain::{like_pattern, AuthorCard, GuideInput, GuideQuery, GuideRecord, GuideSummary, SortOrder};
use crate::guides::repository::GuideRepository;
use crate::users::domain::UserProfile;
use models::{guide, profession, user, user_detail};

/// SeaORM-backed repository implementation.
pub struct SeaOrmGuideRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmGuideRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn find_model(&self, guide_id: i32) -> Result<guide::Model, ServiceError> {
        guide::Entity::find_by_id(guide_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| ServiceError::not_found("Guide"))
    }

    /// Avatar and profession name per author.
    async fn author_extras(&self, user_ids: Vec<i32>) -> Result<HashMap<i32, (Option<String>, Option<String>)>, ServiceError> {
        let rows = user_detail::Entity::find()
            .filter(user_detail::Column::UserId.is_in(user_ids))
            .find_also_related(profession::Entity)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(detail, prof)| detail.user_id.map(|uid| (uid, (detail.avatar, prof.map(|p| p.name)))))
            .collect())
    }
}

/// Filtered and ordered guide query; shared by count and list so page maths match the rows.
fn select(query: &GuideQuery) -> Select<guide::Entity> {
    let mut select = guide::Entity::find();
    if query.published_only {
        select = select.filter(guide::Column::Published.eq(true));
    }
    if let Some(owner_id) = query.owner_id {
        select = select.filter(guide::Column::UserId.eq(owner_id));
    }
    if let Some(title) = &query.title {
        select = select.filter(
            Expr::expr(Func::lower(Expr::col((guide::Entity, guide::Column::Title))))
                .like(LikeExpr::new(like_pattern(title)).escape('\\')),
        );
    }
    match query.order {
        SortOrder::Asc => select.order_by_asc(guide::Column::LastModified).order_by_asc(guide::Column::Id),
        SortOrder::Desc => select.order_by_desc(guide::Column::LastModified).order_by_desc(guide::Column::Id),
    }
}

#[async_trait]
impl GuideRepository for SeaOrmGuideRepository {
    async fn count(&self, query: &GuideQuery) -> Result<u64, ServiceError> {
        Ok(select(query).count(&self.db).await?)
    }

    async fn list(&self, query: &GuideQuery, offset: u64, limit: u64) -> Result<Vec<GuideSummary>, ServiceError> {
        let rows = select(query)
            .find_also_related(user::Entity)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await?;

        let mut user_ids: Vec<i32> = rows.iter().map(|(g, _)| g.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();
        let extras = self.author_extras(user_ids).await?;

        Ok(rows
            .into_iter()
            .filter_map(|(g, author)| {
                let author = author?;
                let (avatar, profession) = extras.get(&author.id).cloned().unwrap_or_default();
                Some(GuideSummary::new(g.into(), AuthorCard { user: author.into(), avatar, profession }))
            })
            .collect())
    }

    async fn get(&self, guide_id: i32) -> Result<Option<GuideRecord>, ServiceError> {
        Ok(guide::Entity::find_by_id(guide_id).one(&self.db).await?.map(GuideRecord::from))
    }

    async fn author(&self, user_id: i32) -> Result<Option<UserProfile>, ServiceError> {
        Ok(user::Entity::find_by_id(user_id).one(&self.db).await?.map(UserProfile::from))
    }

    async fn insert(&self, user_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError> {
        let created = guide::create(&self.db, user_id, &input.title, &input.content, input.note.as_deref(), input.published).await?;
        Ok(created.into())
    }

    async fn update(&self, guide_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError> {
        let mut am: guide::ActiveModel = self.find_model(guide_id).await?.into();
        am.title = Set(input.title.clone());
        am.content = Set(input.content.clone());
        am.note = Set(input.note.clone());
        am.published = Set(input.published);
        am.last_modified = Set(Utc::now().into());
        Ok(am.update(&self.db).await?.into())
    }

    async fn set_cover_image(&self, guide_id: i32, path: Option<String>) -> Result<GuideRecord, ServiceError> {
        let mut am: guide::ActiveModel = self.find_model(guide_id).await?.into();
        am.cover_image = Set(path);
        Ok(am.update(&self.db).await?.into())
    }

    async fn delete(&self, guide_id: i32) -> Result<bool, ServiceError> {
        let res = guide::Entity::delete_by_id(guide_id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
