//! Resolves submitted product references against the catalog.

use bundle_kit_core::ProductGid;
use tracing::instrument;

use super::catalog::BundleCatalog;
use super::error::BundleError;
use super::types::{ProductReference, ResolvedProduct};

/// Resolve every reference to a full product, preserving order.
///
/// Fails as a whole if any id does not come back as a product.
///
/// # Errors
///
/// Returns [`BundleError::Validation`] for an empty input,
/// [`BundleError::Resolution`] listing the ids that did not resolve, or
/// [`BundleError::Shopify`] if the lookup itself fails.
#[instrument(skip_all, fields(product_count = references.len()))]
pub async fn resolve_products<C: BundleCatalog>(
    catalog: &C,
    references: &[ProductReference],
) -> Result<Vec<ResolvedProduct>, BundleError> {
    if references.is_empty() {
        return Err(BundleError::Validation(
            "at least one product is required".to_string(),
        ));
    }

    let ids: Vec<ProductGid> = references.iter().map(|r| r.id.clone()).collect();
    let mut nodes = catalog.product_details(&ids).await?.into_iter();

    let mut resolved = Vec::with_capacity(ids.len());
    let mut missing = Vec::new();
    for id in &ids {
        match nodes.next().flatten() {
            Some(product) => resolved.push(product),
            None => missing.push(id.to_string()),
        }
    }

    if !missing.is_empty() {
        tracing::warn!(?missing, "Product lookup returned incomplete data");
        return Err(BundleError::Resolution { missing });
    }

    Ok(resolved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::bundles::fake::FakeCatalog;

    fn reference(id: &str) -> ProductReference {
        ProductReference {
            id: ProductGid::parse(id).unwrap(),
            title: String::new(),
            image_src: String::new(),
            price: "1.00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_resolves_in_input_order() {
        let catalog = FakeCatalog::new();
        catalog.add_product(1).add_product(2);

        let resolved = resolve_products(&catalog, &[reference("2"), reference("1")])
            .await
            .unwrap();
        let ids: Vec<_> = resolved.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["gid://shopify/Product/2", "gid://shopify/Product/1"]);
    }

    #[tokio::test]
    async fn test_any_missing_product_fails_whole_batch() {
        let catalog = FakeCatalog::new();
        catalog.add_product(1);

        let err = resolve_products(&catalog, &[reference("1"), reference("404")])
            .await
            .unwrap_err();
        match err {
            BundleError::Resolution { missing } => {
                assert_eq!(missing, vec!["gid://shopify/Product/404"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_input_never_calls_catalog() {
        let catalog = FakeCatalog::new();
        let err = resolve_products(&catalog, &[]).await.unwrap_err();
        assert!(matches!(err, BundleError::Validation(_)));
        assert_eq!(catalog.detail_calls(), 0);
    }
}
