use async_trait::async_trait;

use super::domain::{AuthUser, Credentials, NewUser};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, user_id: i32) -> Result<Option<AuthUser>, AuthError>;
    /// Insert the user together with its empty detail row.
    async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError>;
    async fn update_password(&self, user_id: i32, password_hash: String) -> Result<(), AuthError>;
    async fn set_active(&self, user_id: i32, active: bool) -> Result<AuthUser, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        users: HashMap<i32, AuthUser>,
        creds: HashMap<i32, Credentials>,
        next_id: i32,
    }

    #[derive(Default)]
    pub struct MockAuthRepository {
        state: Mutex<State>,
    }

    impl MockAuthRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, AuthError> {
            self.state.lock().map_err(|e| AuthError::Repository(e.to_string()))
        }

        /// Flip the instructor flag the way a profile update would.
        pub fn set_instructor(&self, user_id: i32, is_instructor: bool) -> Result<(), AuthError> {
            let mut state = self.lock()?;
            let user = state.users.get_mut(&user_id).ok_or(AuthError::NotFound)?;
            user.is_instructor = is_instructor;
            Ok(())
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let email = models::user::normalize_email(email);
            Ok(self.lock()?.users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, user_id: i32) -> Result<Option<AuthUser>, AuthError> {
            Ok(self.lock()?.users.get(&user_id).cloned())
        }

        async fn create_user(&self, new_user: NewUser) -> Result<AuthUser, AuthError> {
            let mut state = self.lock()?;
            let email = models::user::normalize_email(&new_user.email);
            if state.users.values().any(|u| u.email == email) {
                return Err(AuthError::Conflict);
            }
            state.next_id += 1;
            let user = AuthUser {
                id: state.next_id,
                email,
                first_name: new_user.first_name.trim().to_string(),
                last_name: new_user.last_name.trim().to_string(),
                is_active: false,
                is_instructor: false,
            };
            state.creds.insert(user.id, Credentials { user_id: user.id, password_hash: new_user.password_hash });
            state.users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn get_credentials(&self, user_id: i32) -> Result<Option<Credentials>, AuthError> {
            Ok(self.lock()?.creds.get(&user_id).cloned())
        }

        async fn update_password(&self, user_id: i32, password_hash: String) -> Result<(), AuthError> {
            let mut state = self.lock()?;
            let creds = state.creds.get_mut(&user_id).ok_or(AuthError::NotFound)?;
            creds.password_hash = password_hash;
            Ok(())
        }

        async fn set_active(&self, user_id: i32, active: bool) -> Result<AuthUser, AuthError> {
            let mut state = self.lock()?;
            let user = state.users.get_mut(&user_id).ok_or(AuthError::NotFound)?;
            user.is_active = active;
            Ok(user.clone())
        }
    }
}
