// src/services/otp.rs
//! One-time passcode engine
//!
//! Codes are 6 uppercase alphanumeric characters with a 60-second lifetime,
//! stored under `otp:<email>` in the secret store. A code is single-use: the
//! stored entry is deleted on the first verification attempt whether or not
//! the submitted code matches.

use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::email::{EmailError, EmailService};
use super::secret_store::SecretStore;
use super::users::UserService;
use crate::auth::models::User;
use crate::common::{is_valid_email, safe_email_log};

/// Codes are drawn uniformly from digits and uppercase letters
const OTP_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const OTP_CODE_LENGTH: usize = 6;
const OTP_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid or expired OTP code")]
    InvalidCode,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Delivery(#[from] EmailError),
}

/// Generates, stores, and validates one-time login codes
pub struct OtpService {
    store: Arc<SecretStore>,
    email: Arc<EmailService>,
    users: Arc<UserService>,
}

impl OtpService {
    pub fn new(store: Arc<SecretStore>, email: Arc<EmailService>, users: Arc<UserService>) -> Self {
        Self {
            store,
            email,
            users,
        }
    }

    /// Issue a fresh code for `email` and hand it to the notifier
    ///
    /// Any previously issued code for the address is invalidated first;
    /// at most one code is live per email.
    pub async fn issue(&self, email: &str) -> Result<(), OtpError> {
        if !is_valid_email(email) {
            return Err(OtpError::InvalidEmail);
        }

        let code = generate_code();
        let key = otp_key(email);

        self.store.delete(&key).await;
        self.store.set(&key, &code, OTP_TTL).await;

        self.email.send_code(email, &code).await?;

        info!(email = %safe_email_log(email), "OTP code issued");

        Ok(())
    }

    /// Verify a submitted code and log the user in
    ///
    /// The stored entry is deleted as soon as it has been looked up, so a
    /// mismatched attempt burns the code too. On a match the user record is
    /// upserted with the email marked verified.
    pub async fn verify(&self, email: &str, code: &str) -> Result<User, OtpError> {
        if !is_valid_email(email) {
            return Err(OtpError::InvalidEmail);
        }

        let key = otp_key(email);
        let stored = self.store.get(&key).await;
        self.store.delete(&key).await;

        match stored {
            Some(expected) if expected == code => {
                debug!(email = %safe_email_log(email), "OTP code matched");
            }
            Some(_) => {
                warn!(email = %safe_email_log(email), "OTP code mismatch");
                return Err(OtpError::InvalidCode);
            }
            None => {
                warn!(email = %safe_email_log(email), "No live OTP code for email");
                return Err(OtpError::InvalidCode);
            }
        }

        let user = self.users.upsert_by_email(email).await?;

        info!(
            user_id = %user.id,
            email = %safe_email_log(email),
            "User authentication successful via email OTP"
        );

        Ok(user)
    }
}

fn otp_key(email: &str) -> String {
    format!("otp:{}", email)
}

/// Produce a 6-character code over `[0-9A-Z]`
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..OTP_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..OTP_ALPHABET.len());
            OTP_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::email::EmailConfig;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> (OtpService, Arc<SecretStore>) {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite pool");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations");

        let store = Arc::new(SecretStore::new());
        let email = Arc::new(EmailService::new(EmailConfig {
            from_email: None,
            region: "us-east-1".to_string(),
        }));
        let users = Arc::new(UserService::new(pool));

        (OtpService::new(store.clone(), email, users), store)
    }

    #[test]
    fn test_generate_code_shape() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()));
        }
    }

    #[tokio::test]
    async fn test_issue_stores_a_code() {
        let (otp, store) = test_service().await;

        otp.issue("a@b.com").await.unwrap();

        let code = store.get("otp:a@b.com").await.expect("code stored");
        assert_eq!(code.len(), 6);
    }

    #[tokio::test]
    async fn test_issue_rejects_malformed_email() {
        let (otp, _) = test_service().await;
        assert!(matches!(
            otp.issue("not-an-email").await,
            Err(OtpError::InvalidEmail)
        ));
    }

    #[tokio::test]
    async fn test_reissue_invalidates_previous_code() {
        let (otp, store) = test_service().await;

        otp.issue("a@b.com").await.unwrap();
        let first = store.get("otp:a@b.com").await.unwrap();

        otp.issue("a@b.com").await.unwrap();
        let second = store.get("otp:a@b.com").await.unwrap();

        if first != second {
            assert!(matches!(
                otp.verify("a@b.com", &first).await,
                Err(OtpError::InvalidCode)
            ));
        }
    }

    #[tokio::test]
    async fn test_verify_succeeds_exactly_once() {
        let (otp, store) = test_service().await;

        otp.issue("a@b.com").await.unwrap();
        let code = store.get("otp:a@b.com").await.unwrap();

        let user = otp.verify("a@b.com", &code).await.unwrap();
        assert_eq!(user.email, "a@b.com");
        assert!(user.email_verified);

        // Code is single-use
        assert!(matches!(
            otp.verify("a@b.com", &code).await,
            Err(OtpError::InvalidCode)
        ));
    }

    #[tokio::test]
    async fn test_mismatched_attempt_burns_the_code() {
        let (otp, store) = test_service().await;

        otp.issue("a@b.com").await.unwrap();
        let code = store.get("otp:a@b.com").await.unwrap();

        let wrong = if code == "000000" { "111111" } else { "000000" };
        assert!(matches!(
            otp.verify("a@b.com", wrong).await,
            Err(OtpError::InvalidCode)
        ));

        // The real code no longer works either
        assert!(matches!(
            otp.verify("a@b.com", &code).await,
            Err(OtpError::InvalidCode)
        ));
    }

    #[tokio::test]
    async fn test_verify_without_issue_fails() {
        let (otp, _) = test_service().await;
        assert!(matches!(
            otp.verify("a@b.com", "ABC123").await,
            Err(OtpError::InvalidCode)
        ));
    }
}
