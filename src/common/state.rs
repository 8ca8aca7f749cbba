// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::auth::session::SessionService;
use crate::services::{GoogleService, OtpService, UserService};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    /// Production-mode flag; controls the `Secure` attribute on auth cookies
    pub production: bool,
    pub session_service: Arc<SessionService>,
    pub google_service: Arc<GoogleService>,
    pub otp_service: Arc<OtpService>,
    pub user_service: Arc<UserService>,
}
