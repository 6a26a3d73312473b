//! Health check endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check.
///
/// Returns 503 Service Unavailable if the identity provider is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.identity().health().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            tracing::warn!(error = %err, "Identity provider not ready");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
