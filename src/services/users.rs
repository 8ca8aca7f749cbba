// src/services/users.rs
//! User directory: canonical user records keyed by google_id or email

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::auth::models::User;
use crate::common::{generate_user_id, safe_email_log};

/// Persistent store of user records
///
/// Uniqueness is enforced on both `email` and `google_id`, so the OAuth and
/// OTP login paths converge on the same record when identifiers match.
#[derive(Debug, Clone)]
pub struct UserService {
    db: SqlitePool,
}

impl UserService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Upsert a user from a Google profile, keyed by `google_id`
    ///
    /// Resolution order: an existing row with this `google_id` is refreshed;
    /// otherwise a row with the same `email` adopts the `google_id`; otherwise
    /// a new record is created. Profile fields and `updated_at` are refreshed
    /// on every login.
    pub async fn upsert_by_google_id(
        &self,
        google_id: &str,
        email: &str,
        name: Option<&str>,
        picture: Option<&str>,
        email_verified: bool,
    ) -> Result<User, sqlx::Error> {
        let existing: Option<User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE google_id = ?")
                .bind(google_id)
                .fetch_optional(&self.db)
                .await?;

        if let Some(user) = existing {
            debug!(user_id = %user.id, "Found existing user by google_id, refreshing profile");
            sqlx::query(
                "UPDATE users SET email = ?, name = ?, picture = ?, email_verified = ?, updated_at = datetime('now') WHERE id = ?",
            )
            .bind(email)
            .bind(name)
            .bind(picture)
            .bind(email_verified)
            .bind(&user.id)
            .execute(&self.db)
            .await?;

            return self.fetch_by_id(&user.id).await;
        }

        // An OTP-created record with the same email adopts the Google identity
        let by_email: Option<User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.db)
                .await?;

        if let Some(user) = by_email {
            debug!(user_id = %user.id, "Linking google_id to existing user matched by email");
            sqlx::query(
                "UPDATE users SET google_id = ?, name = ?, picture = ?, email_verified = ?, updated_at = datetime('now') WHERE id = ?",
            )
            .bind(google_id)
            .bind(name)
            .bind(picture)
            .bind(email_verified)
            .bind(&user.id)
            .execute(&self.db)
            .await?;

            return self.fetch_by_id(&user.id).await;
        }

        let id = generate_user_id();
        info!(
            user_id = %id,
            email = %safe_email_log(email),
            provider = "google",
            "Creating new user account via Google OAuth"
        );

        sqlx::query(
            "INSERT INTO users (id, email, name, picture, email_verified, google_id) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(email)
        .bind(name)
        .bind(picture)
        .bind(email_verified)
        .bind(google_id)
        .execute(&self.db)
        .await?;

        self.fetch_by_id(&id).await
    }

    /// Upsert a user from a verified email login
    ///
    /// A successful OTP verification proves control of the address, so
    /// `email_verified` is always set on the resulting record.
    pub async fn upsert_by_email(&self, email: &str) -> Result<User, sqlx::Error> {
        let existing: Option<User> =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
                .bind(email)
                .fetch_optional(&self.db)
                .await?;

        if let Some(user) = existing {
            sqlx::query(
                "UPDATE users SET email_verified = 1, updated_at = datetime('now') WHERE id = ?",
            )
            .bind(&user.id)
            .execute(&self.db)
            .await?;

            return self.fetch_by_id(&user.id).await;
        }

        let id = generate_user_id();
        info!(
            user_id = %id,
            email = %safe_email_log(email),
            provider = "email-otp",
            "Creating new user account via email OTP"
        );

        sqlx::query("INSERT INTO users (id, email, email_verified) VALUES (?, ?, 1)")
            .bind(&id)
            .bind(email)
            .execute(&self.db)
            .await?;

        self.fetch_by_id(&id).await
    }

    /// Look up a user by id
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await
    }

    async fn fetch_by_id(&self, id: &str) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(&self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_service() -> UserService {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite pool");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("migrations");
        UserService::new(pool)
    }

    #[tokio::test]
    async fn test_google_upsert_creates_then_refreshes() {
        let users = test_service().await;

        let created = users
            .upsert_by_google_id("g-1", "a@b.com", Some("Ada"), None, true)
            .await
            .unwrap();
        assert!(created.id.starts_with("U_"));
        assert_eq!(created.email, "a@b.com");
        assert!(created.email_verified);

        let refreshed = users
            .upsert_by_google_id("g-1", "a@b.com", Some("Ada L."), Some("http://p/x.png"), true)
            .await
            .unwrap();
        assert_eq!(refreshed.id, created.id);
        assert_eq!(refreshed.name.as_deref(), Some("Ada L."));
        assert_eq!(refreshed.picture.as_deref(), Some("http://p/x.png"));
    }

    #[tokio::test]
    async fn test_oauth_then_otp_converges_on_same_record() {
        let users = test_service().await;

        let via_oauth = users
            .upsert_by_google_id("g-1", "a@b.com", Some("Ada"), None, true)
            .await
            .unwrap();
        let via_otp = users.upsert_by_email("a@b.com").await.unwrap();

        assert_eq!(via_oauth.id, via_otp.id);
    }

    #[tokio::test]
    async fn test_otp_then_oauth_adopts_google_id() {
        let users = test_service().await;

        let via_otp = users.upsert_by_email("a@b.com").await.unwrap();
        assert!(via_otp.google_id.is_none());

        let via_oauth = users
            .upsert_by_google_id("g-9", "a@b.com", Some("Ada"), None, true)
            .await
            .unwrap();
        assert_eq!(via_oauth.id, via_otp.id);
        assert_eq!(via_oauth.google_id.as_deref(), Some("g-9"));
    }

    #[tokio::test]
    async fn test_otp_upsert_marks_email_verified() {
        let users = test_service().await;

        users
            .upsert_by_google_id("g-1", "a@b.com", None, None, false)
            .await
            .unwrap();
        let after_otp = users.upsert_by_email("a@b.com").await.unwrap();
        assert!(after_otp.email_verified);
    }

    #[tokio::test]
    async fn test_find_by_id_absent() {
        let users = test_service().await;
        assert!(users.find_by_id("U_MISSING").await.unwrap().is_none());
    }
}
