use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::user;

pub const TITLE_MAX_LEN: usize = 70;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "guide")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub note: Option<String>,
    pub published: bool,
    pub last_modified: DateTimeWithTimeZone,
    pub cover_image: Option<String>,
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and bound the title; returns the value to store.
pub fn validate_title(title: &str) -> Result<String, ModelError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ModelError::Validation("title required".into()));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(ModelError::Validation(format!("title longer than {TITLE_MAX_LEN} characters")));
    }
    Ok(title.to_string())
}

pub fn validate_content(content: &str) -> Result<(), ModelError> {
    if content.trim().is_empty() {
        return Err(ModelError::Validation("content required".into()));
    }
    Ok(())
}

/// Blank notes are stored as NULL.
pub fn normalize_note(note: Option<&str>) -> Option<String> {
    note.map(str::trim).filter(|n| !n.is_empty()).map(str::to_string)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    title: &str,
    content: &str,
    note: Option<&str>,
    published: bool,
) -> Result<Model, ModelError> {
    let title = validate_title(title)?;
    validate_content(content)?;
    let am = ActiveModel {
        title: Set(title),
        content: Set(content.to_string()),
        note: Set(normalize_note(note)),
        published: Set(published),
        last_modified: Set(Utc::now().into()),
        cover_image: Set(None),
        user_id: Set(user_id),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
