//! Session token issuance and verification
//!
//! Tokens are stateless HS256 JWTs carrying a `userId` claim and a 7-day
//! expiry. The signing secret is loaded once at startup and injected here;
//! nothing in this module reads ambient configuration.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::models::Claims;

/// Session lifetime: 7 days
pub const SESSION_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("session token expired")]
    Expired,

    #[error("invalid session token")]
    Invalid,
}

/// Signs and verifies session tokens with a process-wide secret
pub struct SessionService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign a token asserting `user_id`, valid for 7 days
    pub fn issue(&self, user_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(SESSION_TTL_SECONDS)).timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
    }

    /// Verify a token and return the embedded user id
    ///
    /// Performs no directory lookup; the caller decides whether the id still
    /// resolves to a live record.
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        let decoded = decode::<Claims>(
            token,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            _ => SessionError::Invalid,
        })?;

        Ok(decoded.claims.user_id)
    }
}
