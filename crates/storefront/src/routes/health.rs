//! Health endpoints.

use axum::{extract::State, http::StatusCode};

use crate::state::AppState;

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 while the durable store is unreachable. The storefront keeps
/// serving from the fallback dataset in that state; this endpoint is how
/// operators see it.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.catalog().check_store().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(
                error = %e,
                backend = state.catalog().backend_name(),
                "Readiness check failed"
            );
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
