// src/services/google.rs
//! Google OAuth client: authorization URL, code exchange, profile fetch

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

const AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Error)]
pub enum GoogleError {
    #[error("Failed to exchange code: {0}")]
    TokenExchange(String),

    #[error("Failed to get user info: {0}")]
    ProfileFetch(String),
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Token endpoint response for the authorization-code grant
#[derive(Debug, Deserialize)]
pub struct GoogleTokens {
    pub access_token: String,
    #[allow(dead_code)]
    pub id_token: Option<String>,
}

/// Profile fields returned by the userinfo endpoint
#[derive(Debug, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    #[serde(default)]
    pub verified_email: bool,
}

#[derive(Debug, Clone)]
pub struct GoogleService {
    config: GoogleConfig,
    client: Client,
}

impl GoogleService {
    pub fn new(config: GoogleConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Build the Google authorization URL the client should be sent to
    ///
    /// `state` is an opaque caller-supplied value passed through untouched.
    pub fn login_url(&self, state: Option<&str>) -> String {
        let mut query = format!(
            "client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode("openid email profile"),
        );

        if let Some(state) = state {
            query.push_str("&state=");
            query.push_str(&urlencoding::encode(state));
        }

        format!("{}?{}", AUTHORIZATION_URL, query)
    }

    /// Exchange an authorization code for provider tokens
    ///
    /// Failures are surfaced immediately with the provider's error body;
    /// there are no retries.
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokens, GoogleError> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        debug!("Exchanging authorization code with Google token endpoint");

        let response = self
            .client
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await
            .map_err(|e| GoogleError::TokenExchange(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(http_status = %status, "Google token endpoint returned error");
            return Err(GoogleError::TokenExchange(body));
        }

        response
            .json::<GoogleTokens>()
            .await
            .map_err(|e| GoogleError::TokenExchange(e.to_string()))
    }

    /// Fetch the authenticated user's profile with the provider access token
    pub async fn fetch_userinfo(&self, access_token: &str) -> Result<GoogleUserInfo, GoogleError> {
        debug!("Fetching user profile from Google userinfo endpoint");

        let response = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| GoogleError::ProfileFetch(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(http_status = %status, "Google userinfo endpoint returned error");
            return Err(GoogleError::ProfileFetch(body));
        }

        response
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| GoogleError::ProfileFetch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> GoogleService {
        GoogleService::new(
            GoogleConfig {
                client_id: "client-123".to_string(),
                client_secret: "secret".to_string(),
                redirect_uri: "http://localhost:8080/auth/google/callback".to_string(),
            },
            Client::new(),
        )
    }

    #[test]
    fn test_login_url_contains_required_params() {
        let url = test_service().login_url(None);

        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fgoogle%2Fcallback"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("scope=openid%20email%20profile"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(!url.contains("state="));
    }

    #[test]
    fn test_login_url_passes_state_through() {
        let url = test_service().login_url(Some("abc/123"));
        assert!(url.contains("state=abc%2F123"));
    }
}
