//! Liveness and readiness probes.

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

/// GET /health - liveness. Answers without touching any downstream
/// dependency, so it keeps working through a store outage.
pub async fn health() -> &'static str {
    "OrderBook API is running"
}

/// GET /ready - readiness. Probes the projection store.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.pqs.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": { "database": "ok" } })),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready" })),
            )
        }
    }
}
