//! Sets the aggregate price on a freshly created bundle product.

use bundle_kit_core::Price;
use thiserror::Error;
use tracing::instrument;

use super::catalog::BundleCatalog;
use crate::shopify::AdminShopifyError;

/// Why the bundle price could not be set.
///
/// The bundle product exists regardless; callers report partial success.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The product has no variant to carry a price.
    #[error("product {0} has no variants")]
    NoVariant(String),

    /// The lookup or update request failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

/// Set `price` on the first variant of `product_id`.
///
/// # Errors
///
/// Returns [`ReconcileError`] if the product has no variants or Shopify
/// rejects the update.
#[instrument(skip(catalog), fields(price = %price))]
pub async fn reconcile_price<C: BundleCatalog>(
    catalog: &C,
    product_id: &str,
    price: Price,
) -> Result<(), ReconcileError> {
    let variant_id = catalog
        .first_variant_id(product_id)
        .await?
        .ok_or_else(|| ReconcileError::NoVariant(product_id.to_string()))?;

    catalog
        .set_variant_price(product_id, &variant_id, price)
        .await?;

    tracing::info!(%variant_id, "Bundle price set");
    Ok(())
}
