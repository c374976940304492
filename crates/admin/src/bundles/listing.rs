//! Bundle listing, ordered by price.

use tracing::instrument;

use super::catalog::BundleCatalog;
use super::types::ListedBundle;
use crate::shopify::AdminShopifyError;

/// Fetch all bundle products, most expensive first.
///
/// Products whose tags do not include the bundle tag are dropped even if the
/// catalog search returned them.
///
/// # Errors
///
/// Returns an error if fetching from Shopify fails.
#[instrument(skip_all)]
pub async fn list_bundles<C: BundleCatalog>(
    catalog: &C,
) -> Result<Vec<ListedBundle>, AdminShopifyError> {
    let products = catalog.bundle_products().await?;
    let fetched = products.len();

    let bundles: Vec<_> = products.into_iter().filter(ListedBundle::is_bundle).collect();
    tracing::debug!(fetched, kept = bundles.len(), "Listed bundles");

    Ok(sort_by_price_desc(bundles))
}

/// Stable sort by first-variant price, highest first.
///
/// Equal prices keep their input order.
#[must_use]
pub fn sort_by_price_desc(bundles: Vec<ListedBundle>) -> Vec<ListedBundle> {
    merge_sort_desc(bundles, &|b: &ListedBundle| b.sort_price())
}

/// Top-down merge sort, descending by `key`, stable.
fn merge_sort_desc<T, K: Ord>(mut items: Vec<T>, key: &impl Fn(&T) -> K) -> Vec<T> {
    if items.len() <= 1 {
        return items;
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort_desc(items, key);
    let right = merge_sort_desc(right, key);
    merge_desc(left, right, key)
}

fn merge_desc<T, K: Ord>(left: Vec<T>, right: Vec<T>, key: &impl Fn(&T) -> K) -> Vec<T> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        // `>=` takes from the left on ties.
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => key(l) >= key(r),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        merged.extend(if take_left { left.next() } else { right.next() });
    }

    merged
}
