//! Health check handlers.

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::bundles::CatalogProvider;
use crate::db;
use crate::state::AppState;

pub fn router<P: CatalogProvider>() -> Router<AppState<P>> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness::<P>))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
pub async fn readiness<P: CatalogProvider>(State(state): State<AppState<P>>) -> StatusCode {
    match db::ping(state.pool()).await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
