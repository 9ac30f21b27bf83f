//! JWT issuing and verification.
//!
//! The subject is the base64 form of the decimal user id so the id never appears
//! verbatim in the token payload.

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn encode_subject(user_id: i32) -> String {
    STANDARD.encode(user_id.to_string())
}

pub fn decode_subject(sub: &str) -> Option<i32> {
    let bytes = STANDARD.decode(sub).ok()?;
    std::str::from_utf8(&bytes).ok()?.parse().ok()
}

/// Signing and verification keys for one HMAC algorithm.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Result<Self, AuthError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::TokenError(format!("unsupported algorithm {algorithm:?}")));
        }
        if secret.is_empty() {
            return Err(AuthError::TokenError("empty secret".into()));
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn issue(&self, user_id: i32) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: i32, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let expires_at = now + self.ttl;
        let claims = Claims { sub: encode_subject(user_id), iat: now.timestamp(), exp: expires_at.timestamp() };
        let token = encode(&Header::new(self.algorithm), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    /// User id carried by `token`. Expiry is reported apart from every other failure.
    pub fn verify(&self, token: &str) -> Result<i32, AuthError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;
        decode_subject(&data.claims.sub).ok_or(AuthError::InvalidToken)
    }
}
