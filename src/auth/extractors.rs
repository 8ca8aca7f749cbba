//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use super::cookies;
use super::session::SessionError;
use crate::common::{ApiError, AppState};

/// Authenticated user id extractor
///
/// Declaring this in a handler signature makes authentication explicit per
/// route: the session token is pulled from the cookie (or Bearer header) and
/// verified, and the handler receives the embedded user id. No database
/// lookup happens here; handlers that need the full record resolve it
/// themselves.
#[derive(Debug)]
pub struct AuthUserId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUserId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = match cookies::token_from_headers(&parts.headers) {
            Some(t) => t,
            None => {
                warn!("Authentication failed: no session token in cookie or header");
                return Err(ApiError::Unauthorized("missing auth token".into()));
            }
        };

        match app_state.session_service.verify(&token) {
            Ok(user_id) => Ok(AuthUserId(user_id)),
            Err(SessionError::Expired) => {
                warn!("Authentication failed: session token expired");
                Err(ApiError::Unauthorized("token expired".into()))
            }
            Err(SessionError::Invalid) => {
                warn!("Authentication failed: invalid session token");
                Err(ApiError::Unauthorized("invalid token".into()))
            }
        }
    }
}
