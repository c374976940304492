//! Bundle creation and listing.
//!
//! # Flow
//!
//! ```text
//! title + selected products
//!   └─▶ resolver   nodes(ids:) lookup, all-or-nothing
//!   └─▶ composer   one component per product, first option values
//!   └─▶ productBundleCreate
//!   └─▶ poller     until COMPLETED / FAILED / timed out / cancelled
//!   └─▶ reconciler first variant price = sum of submitted prices
//! ```
//!
//! Listing is independent: fetch tagged products, filter, stable sort by price.
//!
//! Everything here talks to Shopify through [`BundleCatalog`], so the
//! workflow runs unchanged against scripted catalogs in tests.

mod cancel;
mod catalog;
mod composer;
mod error;
#[cfg(test)]
mod fake;
mod listing;
mod poller;
mod reconciler;
mod resolver;
mod types;
mod workflow;

pub use cancel::{Cancellation, CancellationHandle};
pub use catalog::{BundleCatalog, CatalogProvider};
pub use composer::compose;
pub use error::BundleError;
pub use listing::{list_bundles, sort_by_price_desc};
pub use poller::{PollPolicy, poll_until_terminal};
pub use reconciler::{ReconcileError, reconcile_price};
pub use resolver::resolve_products;
pub use types::{
    BUNDLE_TAG, BundleComponent, BundleCreateInput, BundleOperation, BundleSubmission,
    ListedBundle, ListedVariant, OptionSelection, ProductOption, ProductReference,
    ResolvedProduct, UserError,
};
pub use workflow::{
    BundleCreation, BundleRequest, BundleWorkflow, CreatedBundle, MAX_BUNDLE_PRODUCTS,
    product_edit_url,
};
