//! Health check endpoint.

use axum::{extract::State, Json};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - liveness check for the deployment environment.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running".to_string(),
        service: "whisperbox".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database_connected: state.store.ping().await,
        timestamp: chrono::Utc::now().timestamp_millis(),
    })
}
