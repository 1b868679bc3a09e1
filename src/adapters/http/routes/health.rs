use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::adapters::http::app_state::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
/// Store connectivity probe. Only runs `SELECT 1`, so a broken table does not
/// read as a connectivity outage.
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let timestamp = Utc::now();
    match app_state.waitlist_use_cases.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                timestamp,
                database: "connected",
                error: None,
            }),
        ),
        Err(err) => {
            tracing::error!(error = %err, "Health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    status: "unhealthy",
                    timestamp,
                    database: "disconnected",
                    error: Some(err.to_string()),
                }),
            )
        }
    }
}
