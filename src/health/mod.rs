// Health module - liveness and connectivity check

use axum::{extract::Extension, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

use crate::common::{success, AppState};

/// Creates and returns the health router
///
/// # Routes
/// - `GET /health` - Health check including database connectivity
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check(Extension(state_lock): Extension<Arc<RwLock<AppState>>>) -> Json<Value> {
    let state = state_lock.read().await.clone();

    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            error!(error = %e, "Health check: database connection error");
            "error"
        }
    };

    let status = if database == "ok" { "ok" } else { "degraded" };

    success(json!({
        "status": status,
        "timestamp": Utc::now().to_rfc3339(),
        "services": {
            "database": database,
        },
    }))
}
