//! Catalog seam between the bundle workflow and Shopify.

use std::future::Future;

use bundle_kit_core::{Price, ProductGid};

use super::types::{
    BundleCreateInput, BundleOperation, BundleSubmission, ListedBundle, ResolvedProduct,
};
use crate::models::ShopSession;
use crate::shopify::AdminShopifyError;

/// Catalog and mutation operations the bundle workflow needs.
///
/// Implemented by [`crate::shopify::AdminClient`] for production and by
/// scripted doubles in tests. Every call is scoped to a single shop.
pub trait BundleCatalog: Send + Sync {
    /// Look up products by id.
    ///
    /// The result has one entry per requested id, in order. An entry is
    /// `None` when the id does not resolve to a product.
    fn product_details(
        &self,
        ids: &[ProductGid],
    ) -> impl Future<Output = Result<Vec<Option<ResolvedProduct>>, AdminShopifyError>> + Send;

    /// Submit `productBundleCreate`.
    fn create_bundle(
        &self,
        input: &BundleCreateInput,
    ) -> impl Future<Output = Result<BundleSubmission, AdminShopifyError>> + Send;

    /// Fetch the current state of a bundle operation.
    fn bundle_operation(
        &self,
        operation_id: &str,
    ) -> impl Future<Output = Result<BundleOperation, AdminShopifyError>> + Send;

    /// Id of a product's first variant, if it has one.
    fn first_variant_id(
        &self,
        product_id: &str,
    ) -> impl Future<Output = Result<Option<String>, AdminShopifyError>> + Send;

    /// Set the price of one variant of a product.
    fn set_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: Price,
    ) -> impl Future<Output = Result<(), AdminShopifyError>> + Send;

    /// All products tagged as bundles, across every page.
    fn bundle_products(
        &self,
    ) -> impl Future<Output = Result<Vec<ListedBundle>, AdminShopifyError>> + Send;

    /// Total number of products in the shop.
    fn product_count(&self) -> impl Future<Output = Result<u64, AdminShopifyError>> + Send;
}

/// Builds a request-scoped [`BundleCatalog`] from an authenticated session.
pub trait CatalogProvider: Clone + Send + Sync + 'static {
    type Catalog: BundleCatalog;

    /// Catalog client acting on behalf of the session's shop.
    fn for_session(&self, session: &ShopSession) -> Self::Catalog;
}
