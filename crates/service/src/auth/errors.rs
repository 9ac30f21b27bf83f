use thiserror::Error;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("Email already registered")]
    Conflict,
    #[error("User not found")]
    NotFound,
    #[error("Incorrect email or password")]
    BadCredentials,
    #[error("Incorrect password")]
    WrongPassword,
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("Inactive user")]
    Inactive,
    #[error("Token expired")]
    TokenExpired,
    #[error("Could not validate credentials")]
    InvalidToken,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::Conflict => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::BadCredentials => 1008,
            AuthError::WrongPassword => 1009,
            AuthError::Inactive => 1005,
            AuthError::TokenExpired => 1006,
            AuthError::InvalidToken => 1007,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            ModelError::Validation(msg) => AuthError::Validation(msg),
            ModelError::NotFound(_) => AuthError::NotFound,
            ModelError::Db(msg) if msg.contains("duplicate key") => AuthError::Conflict,
            ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn codes_are_distinct() {
        let all = [
            AuthError::Validation(String::new()), AuthError::Conflict, AuthError::NotFound,
            AuthError::Unauthorized, AuthError::BadCredentials, AuthError::WrongPassword, AuthError::Inactive, AuthError::TokenExpired,
            AuthError::InvalidToken, AuthError::HashError(String::new()),
            AuthError::TokenError(String::new()), AuthError::Repository(String::new()),
        ];
        let mut codes: Vec<u16> = all.iter().map(AuthError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let e: AuthError = ModelError::Db("duplicate key value violates unique constraint \"user_email_key\"".into()).into();
        assert!(matches!(e, AuthError::Conflict));
        let e: AuthError = ModelError::Db("connection reset".into()).into();
        assert!(matches!(e, AuthError::Repository(_)));
    }
}
