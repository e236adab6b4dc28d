// handlers/health.rs - GET /api/health handler

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

pub async fn health_get(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let timestamp = chrono::Utc::now().to_rfc3339();
    match state.auth.health().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "backend": "reachable", "timestamp": timestamp })),
        ),
        Err(e) => {
            warn!(error = %e, "backend health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "backend": "unreachable", "timestamp": timestamp })),
            )
        }
    }
}
