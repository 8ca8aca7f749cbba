// src/main.rs
use axum::{extract::Extension, middleware, Router};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod health;
mod logging_middleware;
mod services;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use auth::session::SessionService;
use common::AppState;
use services::email::EmailConfig;
use services::google::GoogleConfig;
use services::{EmailService, GoogleService, OtpService, SecretStore, UserService};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://auth_api.db".to_string());
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let production = env::var("APP_ENV").unwrap_or_default() == "production";

    let google_config = GoogleConfig {
        client_id: env::var("GOOGLE_CLIENT_ID").unwrap_or_default(),
        client_secret: env::var("GOOGLE_CLIENT_SECRET").unwrap_or_default(),
        redirect_uri: env::var("GOOGLE_REDIRECT_URI")
            .unwrap_or_else(|_| "http://localhost:8080/auth/google/callback".to_string()),
    };
    if google_config.client_id.is_empty() {
        warn!("GOOGLE_CLIENT_ID not set - Google login will fail until configured");
    }

    let email_config = EmailConfig {
        from_email: env::var("AWS_SES_FROM_EMAIL").ok().filter(|v| !v.is_empty()),
        region: env::var("AWS_SES_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
    };
    if email_config.from_email.is_none() {
        info!("AWS_SES_FROM_EMAIL not set - OTP codes will be logged instead of emailed");
    }

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    // Identity-provider calls get a conservative timeout so a slow upstream
    // cannot hold a login request open indefinitely.
    let http_client = Client::builder()
        .timeout(Duration::from_secs(10))
        .no_proxy()
        .build()?;

    let session_service = Arc::new(SessionService::new(&jwt_secret));
    info!("SessionService initialized");

    let google_service = Arc::new(GoogleService::new(google_config, http_client.clone()));
    info!("GoogleService initialized");

    let email_service = Arc::new(EmailService::new(email_config));
    info!("EmailService initialized");

    let secret_store = Arc::new(SecretStore::new());
    let user_service = Arc::new(UserService::new(pool.clone()));
    let otp_service = Arc::new(OtpService::new(
        secret_store,
        email_service,
        user_service.clone(),
    ));
    info!("OtpService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        production,
        session_service,
        google_service,
        otp_service,
        user_service,
    };

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .merge(auth::auth_routes())
        .merge(health::health_routes())
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared.clone()))
        .layer({
            let cors_origins = env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3000,http://localhost:5173".to_string());

            let origins: Vec<axum::http::HeaderValue> = cors_origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
