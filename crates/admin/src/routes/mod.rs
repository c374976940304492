//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Bundles (session token required)
//! POST /api/save-bundle        - Create a bundle from selected products
//! GET  /api/get-bundles        - Bundle products, most expensive first
//!
//! # Products (session token required)
//! GET  /api/products/count     - Number of products in the shop
//!
//! # Feedback (session token required)
//! POST /api/feedback           - Record a thumbs up / thumbs down
//! ```

pub mod bundles;
pub mod feedback;
pub mod health;
pub mod products;

use axum::{Router, http::header::InvalidHeaderValue, middleware};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::bundles::CatalogProvider;
use crate::middleware::{embedded_app_csp, request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// All application routes, without state or middleware.
pub fn routes<P: CatalogProvider>() -> Router<AppState<P>> {
    Router::new()
        .merge(health::router())
        .merge(bundles::router())
        .merge(products::router())
        .merge(feedback::router())
}

/// Build the full application: routes, middleware and state.
///
/// Sentry layers are added by the binary, outside of this router.
///
/// # Errors
///
/// Returns an error if the configured store cannot be used in a header.
pub fn app<P: CatalogProvider>(state: AppState<P>) -> Result<Router, InvalidHeaderValue> {
    let csp = embedded_app_csp(&state.config().shopify.store)?;

    Ok(routes::<P>()
        .layer(middleware::from_fn_with_state(
            csp,
            security_headers_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        shop = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state))
}
