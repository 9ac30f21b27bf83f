use sea_orm::{DatabaseConnection, EntityTrait, ColumnTrait, QueryFilter, TransactionTrait};

use crate::auth::domain::{AuthUser, Credentials, NewUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use models::{user, user_detail};

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn repo_err(e: impl std::fmt::Display) -> AuthError { AuthError::Repository(e.to_string()) }

fn to_auth_user(u: user::Model, detail: Option<user_detail::Model>) -> AuthUser {
    AuthUser {
        id: u.id,
        email: u.email,
        first_name: u.first_name,
        last_name: u.last_name,
        is_active: u.is_active,
        is_instructor: detail.map(|d| d.is_instructor).unwrap_or(false),
    }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find()
            .filter(user::Column::Email.eq(user::normalize_email(email)))
            .find_also_related(user_detail::Entity)
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(res.map(|(u, d)| to_auth_user(u, d)))
    }

    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<AuthUser>, AuthError> {
        let res = user::Entity::find_by_id(user_id)
            .find_also_related(user_detail::Entity)
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(res.map(|(u, d)| to_auth_user(u, d)))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError> {
        let txn = self.db.begin().await.map_err(repo_err)?;
        let created = user::create(&txn, &new_user.email, &new_user.password_hash, &new_user.first_name, &new_user.last_name).await?;
        let detail = user_detail::create_for_user(&txn, created.id).await?;
        txn.commit().await.map_err(repo_err)?;
        Ok(to_auth_user(created, Some(detail)))
    }

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
        let res = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password }))
    }

    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<(), AuthError> {
        Ok(user::update_password(&self.db, user_id, &password_hash).await?)
    }

    async fn set_active(&self, user_id: i32, active: bool) -> Result<AuthUser, AuthError> {
        let updated = user::set_active(&self.db, user_id, active).await?;
        let detail = user_detail::find_by_user(&self.db, user_id).await?;
        Ok(to_auth_user(updated, detail))
    }
}
