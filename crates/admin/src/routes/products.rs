//! Product route handlers.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use tracing::instrument;

use crate::bundles::{BundleCatalog, CatalogProvider};
use crate::error::AppError;
use crate::models::ShopSession;
use crate::state::AppState;

pub fn router<P: CatalogProvider>() -> Router<AppState<P>> {
    Router::new().route("/api/products/count", get(product_count::<P>))
}

#[derive(Debug, Serialize)]
pub struct ProductCountResponse {
    pub count: u64,
}

/// Number of products in the session's shop.
///
/// # Errors
///
/// Returns an error if the Shopify request fails.
#[instrument(skip_all)]
pub async fn product_count<P: CatalogProvider>(
    session: ShopSession,
    State(state): State<AppState<P>>,
) -> Result<Json<ProductCountResponse>, AppError> {
    let catalog = state.catalogs().for_session(&session);
    let count = catalog.product_count().await?;
    Ok(Json(ProductCountResponse { count }))
}
