//! Automation status endpoint

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use blog_services::{cron_expression, validate, GenerationStats, ScheduleConfig};

use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AutomationStatus {
    config: ScheduleConfig,
    stats: GenerationStats,
    cron_expression: String,
    should_generate: bool,
    seconds_until_next: u64,
    config_errors: Vec<String>,
    status_report: String,
}

/// GET /api/automation/status
async fn automation_status(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();
    let manager = state.manager.read().await;
    let config = manager.config().clone();

    let status = AutomationStatus {
        cron_expression: cron_expression(&config),
        config_errors: validate(&config).err().unwrap_or_default(),
        stats: manager.stats().clone(),
        should_generate: manager.should_generate(now),
        seconds_until_next: manager.time_until_next(now).as_secs(),
        status_report: manager.status_report(now),
        config,
    };

    (StatusCode::OK, Json(status))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/automation/status", get(automation_status))
}
