//! Health check endpoints

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    posts: Option<usize>,
    automation_enabled: bool,
}

/// Health check handler; degraded when the database cannot be read
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let posts = state.storage.post_count().ok();
    let automation_enabled = state.manager.read().await.config().enabled;

    let (code, status) = match posts {
        Some(_) => (StatusCode::OK, "healthy"),
        None => (StatusCode::SERVICE_UNAVAILABLE, "degraded"),
    };

    let response = HealthResponse {
        status: status.to_string(),
        posts,
        automation_enabled,
    };

    (code, Json(response))
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
