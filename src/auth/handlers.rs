//! Authentication handlers
//!
//! Each handler composes the services in AppState into one login flow step
//! and converts every failure into an ApiError at this boundary.

use axum::extract::{Extension, Json, Query};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::cookies;
use super::extractors::AuthUserId;
use super::models::{GoogleCallbackQuery, LoginUrlQuery, SendOtpRequest, VerifyOtpRequest};
use super::validators::OtpValidator;
use crate::common::{
    message_only, safe_email_log, success, success_with_message, ApiError, AppState, Validator,
};

/// GET /auth/google
/// Returns the Google authorization URL the client should redirect to.
/// An optional `state` query value is passed through to the provider.
pub async fn google_login_url(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<LoginUrlQuery>,
) -> Json<Value> {
    let state = state_lock.read().await.clone();

    let url = state.google_service.login_url(query.state.as_deref());

    debug!("Generated Google login URL");

    success(json!({ "url": url }))
}

/// GET /auth/google/callback?code=&state=
/// Exchanges the authorization code, fetches the Google profile, upserts the
/// user record, and issues a session token (body + cookie).
pub async fn google_callback(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<GoogleCallbackQuery>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let code = match query.code.as_deref() {
        Some(code) if !code.is_empty() => code.to_string(),
        _ => {
            warn!("OAuth callback received without an authorization code");
            return Err(ApiError::MissingCode);
        }
    };

    info!("Received OAuth callback with authorization code");

    let tokens = state.google_service.exchange_code(&code).await?;
    let profile = state
        .google_service
        .fetch_userinfo(&tokens.access_token)
        .await?;

    debug!(
        email = %safe_email_log(&profile.email),
        provider = "google",
        provider_id = %profile.id,
        "Google profile fetched, resolving user record"
    );

    let user = state
        .user_service
        .upsert_by_google_id(
            &profile.id,
            &profile.email,
            profile.name.as_deref(),
            profile.picture.as_deref(),
            profile.verified_email,
        )
        .await?;

    let token = state
        .session_service
        .issue(&user.id)
        .map_err(|e| ApiError::InternalServer(format!("jwt error: {}", e)))?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        provider = "google",
        "User authentication successful via Google OAuth"
    );

    let cookie = cookies::build_access_cookie(&token, state.production);

    Ok((
        [(header::SET_COOKIE, cookie)],
        success_with_message(json!({ "user": user, "token": token }), "Login successful"),
    )
        .into_response())
}

/// POST /auth/email/send-otp
/// Issues a one-time login code for the address. The response never reveals
/// whether the address already has an account.
pub async fn send_otp(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SendOtpRequest>,
) -> Result<Json<Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = OtpValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    state.otp_service.issue(&payload.email).await?;

    Ok(message_only("OTP code sent to your email"))
}

/// POST /auth/email/verify-otp
/// Verifies the submitted code and logs the user in with a session token
/// (body + cookie).
pub async fn verify_otp(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<VerifyOtpRequest>,
) -> Result<Response, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = OtpValidator.validate(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let user = state
        .otp_service
        .verify(&payload.email, &payload.code)
        .await?;

    let token = state
        .session_service
        .issue(&user.id)
        .map_err(|e| ApiError::InternalServer(format!("jwt error: {}", e)))?;

    let cookie = cookies::build_access_cookie(&token, state.production);

    Ok((
        [(header::SET_COOKIE, cookie)],
        success_with_message(json!({ "user": user, "token": token }), "Login successful"),
    )
        .into_response())
}

/// POST /auth/signout
/// Stateless sign-out: clears the access-token cookie. Cannot fail.
pub async fn signout(Extension(state_lock): Extension<Arc<RwLock<AppState>>>) -> Response {
    let state = state_lock.read().await.clone();

    info!("User signed out");

    let cookie = cookies::clear_access_cookie(state.production);

    (
        [(header::SET_COOKIE, cookie)],
        message_only("Sign out successful"),
    )
        .into_response()
}

/// GET /user/me
/// Returns the current authenticated user's record.
#[axum::debug_handler]
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    AuthUserId(user_id): AuthUserId,
) -> Result<Json<Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = state
        .user_service
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| {
            warn!(user_id = %user_id, "Token resolved to a user id that no longer exists");
            ApiError::NotFound("User not found".to_string())
        })?;

    Ok(success(json!({ "user": user })))
}
