//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `GET /auth/google` - Google OAuth login URL
/// - `GET /auth/google/callback` - OAuth callback (code exchange + login)
/// - `POST /auth/email/send-otp` - Send a one-time login code
/// - `POST /auth/email/verify-otp` - Verify code and log in
/// - `POST /auth/signout` - Clear the session cookie
/// - `GET /user/me` - Current authenticated user
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/google", get(handlers::google_login_url))
        .route("/auth/google/callback", get(handlers::google_callback))
        .route("/auth/email/send-otp", post(handlers::send_otp))
        .route("/auth/email/verify-otp", post(handlers::verify_otp))
        .route("/auth/signout", post(handlers::signout))
        .route("/user/me", get(handlers::me))
}
