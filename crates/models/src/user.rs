use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{guide, user_detail};

pub const EMAIL_MAX_LEN: usize = 255;
pub const NAME_MAX_LEN: usize = 128;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UserDetail,
    Guide,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UserDetail => Entity::has_one(user_detail::Entity).into(),
            Relation::Guide => Entity::has_many(guide::Entity).into(),
        }
    }
}

impl Related<user_detail::Entity> for Entity {
    fn to() -> RelationDef { Relation::UserDetail.def() }
}

impl Related<guide::Entity> for Entity {
    fn to() -> RelationDef { Relation::Guide.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Lower-cased, trimmed form used for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    if email.len() > EMAIL_MAX_LEN {
        return Err(ModelError::Validation("email too long".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX_LEN {
        return Err(ModelError::Validation(format!("name longer than {NAME_MAX_LEN} characters")));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Model, ModelError> {
    validate_email(email)?;
    validate_name(first_name)?;
    validate_name(last_name)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        email: Set(normalize_email(email)),
        password: Set(password_hash.to_string()),
        first_name: Set(first_name.trim().to_string()),
        last_name: Set(last_name.trim().to_string()),
        is_active: Set(false),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await?)
}

async fn find_active_model<C: ConnectionTrait>(db: &C, id: i32) -> Result<ActiveModel, ModelError> {
    Ok(Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(ModelError::NotFound("user"))?
        .into())
}

pub async fn set_active<C: ConnectionTrait>(db: &C, id: i32, active: bool) -> Result<Model, ModelError> {
    let mut am = find_active_model(db, id).await?;
    am.is_active = Set(active);
    Ok(am.update(db).await?)
}

pub async fn update_names<C: ConnectionTrait>(db: &C, id: i32, first_name: &str, last_name: &str) -> Result<Model, ModelError> {
    validate_name(first_name)?;
    validate_name(last_name)?;
    let mut am = find_active_model(db, id).await?;
    am.first_name = Set(first_name.trim().to_string());
    am.last_name = Set(last_name.trim().to_string());
    Ok(am.update(db).await?)
}

pub async fn update_password<C: ConnectionTrait>(db: &C, id: i32, password_hash: &str) -> Result<(), ModelError> {
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let mut am = find_active_model(db, id).await?;
    am.password = Set(password_hash.to_string());
    am.update(db).await?;
    Ok(())
}

/// Remove the user; details and guides go with it through the FK cascade.
pub async fn delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
