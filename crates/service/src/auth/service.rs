use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::Algorithm;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, LoginInput, NewUser, RegisterInput};
use super::errors::AuthError;
use super::password::{check_strength, hash_password, verify_password};
use super::repository::AuthRepository;
use super::token::{IssuedToken, TokenCodec};
use crate::mail::{activation_body, Email, ACTIVATE_ACCOUNT_SUBJECT};

pub const TOKEN_TYPE: &str = "bearer";

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: Algorithm,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret_key: impl Into<String>, algorithm: Algorithm, token_exp_minutes: i64) -> Self {
        Self { secret_key: secret_key.into(), algorithm, token_ttl: Duration::minutes(token_exp_minutes) }
    }

    pub fn from_settings(cfg: &configs::AuthConfig) -> Result<Self, AuthError> {
        let algorithm = Algorithm::from_str(&cfg.algorithm).map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(Self::new(cfg.secret_key.clone(), algorithm, cfg.token_exp_minutes))
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    tokens: TokenCodec,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Result<Self, AuthError> {
        let tokens = TokenCodec::new(&cfg.secret_key, cfg.algorithm, cfg.token_ttl)?;
        Ok(Self { repo, tokens })
    }

    pub fn repository(&self) -> &Arc<R> { &self.repo }

    /// Register a new, inactive user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo, AuthConfig::new("secret", jsonwebtoken::Algorithm::HS256, 60)).unwrap();
    /// let input = RegisterInput { email: "User@Example.com".into(), first_name: "Ann".into(), last_name: "Lee".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert!(!user.is_active);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        models::user::validate_email(&input.email)?;
        models::user::validate_name(&input.first_name)?;
        models::user::validate_name(&input.last_name)?;
        check_strength(&input.password)?;

        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(&input.password)?;
        let user = self.repo.create_user(NewUser {
            email: models::user::normalize_email(&input.email),
            first_name: input.first_name,
            last_name: input.last_name,
            password_hash,
        }).await?;
        info!(user_id = user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Check an e-mail/password pair without looking at the activation state.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let user = self.repo.find_user_by_email(email).await?.ok_or(AuthError::BadCredentials)?;
        let cred = self.repo.get_credentials(user.id).await?.ok_or(AuthError::BadCredentials)?;
        if !verify_password(password, &cred.password_hash)? {
            return Err(AuthError::BadCredentials);
        }
        Ok(user)
    }

    /// Authenticate an active user and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::{AuthRepository, mock::MockAuthRepository}};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let svc = AuthService::new(repo.clone(), AuthConfig::new("secret", jsonwebtoken::Algorithm::HS256, 60)).unwrap();
    /// let user = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), first_name: "N".into(), last_name: "M".into(), password: "Passw0rd".into() })).unwrap();
    /// tokio_test::block_on(repo.set_active(user.id, true)).unwrap();
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert_eq!(session.token_type, "bearer");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.authenticate(&input.email, &input.password).await?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        let issued = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "user_logged_in");
        Ok(AuthSession { user, access_token: issued.token, token_type: TOKEN_TYPE.to_string() })
    }

    pub fn create_token(&self, user_id: i32) -> Result<IssuedToken, AuthError> {
        self.tokens.issue(user_id)
    }

    pub fn decode_token(&self, token: &str) -> Result<i32, AuthError> {
        self.tokens.verify(token)
    }

    /// User behind a token, active or not.
    pub async fn current_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let user_id = self.decode_token(token)?;
        self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::Unauthorized)
    }

    pub async fn current_active_user(&self, token: &str) -> Result<AuthUser, AuthError> {
        let user = self.current_user(token).await?;
        if !user.is_active {
            return Err(AuthError::Inactive);
        }
        Ok(user)
    }

    /// Activate the account named by an activation token.
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<AuthUser, AuthError> {
        let user = self.current_user(token).await?;
        if user.is_active {
            return Ok(user);
        }
        let user = self.repo.set_active(user.id, true).await?;
        info!(user_id = user.id, "user_activated");
        Ok(user)
    }

    #[instrument(skip(self, input))]
    pub async fn change_password(&self, user_id: i32, input: ChangePasswordInput) -> Result<(), AuthError> {
        let cred = self.repo.get_credentials(user_id).await?.ok_or(AuthError::Unauthorized)?;
        if !verify_password(&input.old_password, &cred.password_hash)? {
            return Err(AuthError::WrongPassword);
        }
        check_strength(&input.new_password)?;
        let hash = hash_password(&input.new_password)?;
        self.repo.update_password(user_id, hash).await?;
        info!(user_id, "password_changed");
        Ok(())
    }

    /// Activation message for a freshly registered user. `base_url` ends with `/`.
    pub fn activation_email(&self, user: &AuthUser, base_url: &str) -> Result<Email, AuthError> {
        let issued = self.tokens.issue(user.id)?;
        let url = format!("{}auth/verify_email?token={}", base_url, issued.token);
        let expire_at = issued.expires_at.format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(Email {
            to: user.email.clone(),
            subject: ACTIVATE_ACCOUNT_SUBJECT.to_string(),
            body: activation_body(&user.first_name, &url, &expire_at),
        })
    }
}
