use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{profession, user};

pub const BIO_MAX_LEN: usize = 2000;

/// One-to-one profile extension of `user`.
///
/// `user_id` is nullable so the row can be written before or independently of its user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_detail")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub profession_id: Option<i32>,
    pub is_instructor: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Profession,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::Profession => Entity::belongs_to(profession::Entity)
                .from(Column::ProfessionId)
                .to(profession::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<profession::Entity> for Entity {
    fn to() -> RelationDef { Relation::Profession.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_bio(bio: &str) -> Result<(), ModelError> {
    if bio.chars().count() > BIO_MAX_LEN {
        return Err(ModelError::Validation(format!("bio longer than {BIO_MAX_LEN} characters")));
    }
    Ok(())
}

/// Empty detail row for a freshly registered user.
pub async fn create_for_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Model, ModelError> {
    let am = ActiveModel {
        user_id: Set(Some(user_id)),
        bio: Set(None),
        avatar: Set(None),
        cover_image: Set(None),
        profession_id: Set(None),
        is_instructor: Set(false),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_user<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await?)
}

/// Detail row for `user_id`, created on demand for accounts that predate it.
pub async fn get_or_create<C: ConnectionTrait>(db: &C, user_id: i32) -> Result<Model, ModelError> {
    match find_by_user(db, user_id).await? {
        Some(detail) => Ok(detail),
        None => create_for_user(db, user_id).await,
    }
}
