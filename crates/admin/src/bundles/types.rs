//! Domain types for the bundle workflow.
//!
//! These are independent of the Shopify wire format; the Admin API client
//! converts its responses into them.

use bundle_kit_core::{BundleOperationStatus, Price, ProductGid};
use serde::Serialize;

/// Tag carried by every product created through this app.
pub const BUNDLE_TAG: &str = "bundle";

/// A product picked by the merchant, as submitted by the client.
///
/// Lives for the duration of one request and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductReference {
    pub id: ProductGid,
    pub title: String,
    /// May be empty when the product has no image.
    pub image_src: String,
    /// Decimal string as shown in the picker; may be a placeholder such as `"N/A"`.
    pub price: String,
}

/// One option axis of a product (e.g. "Size" with values S, M, L).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

/// A product as returned by the catalog, ready for composition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProduct {
    pub id: String,
    pub title: String,
    pub options: Vec<ProductOption>,
    pub first_variant_id: Option<String>,
}

/// The value chosen for one option axis of a component product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSelection {
    pub component_option_id: String,
    pub name: String,
    pub value: String,
}

/// One product inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleComponent {
    pub product_id: String,
    pub quantity: u32,
    /// Exactly one entry per option of the source product.
    pub option_selections: Vec<OptionSelection>,
}

/// Input of the `productBundleCreate` mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleCreateInput {
    pub title: String,
    pub components: Vec<BundleComponent>,
}

/// A user error reported by a Shopify mutation or operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.field {
            Some(field) if !field.is_empty() => write!(f, "{}: {}", field.join("."), self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Snapshot of an asynchronous bundle operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOperation {
    pub id: String,
    pub status: BundleOperationStatus,
    /// Set once the operation has produced the bundle product.
    pub product_id: Option<String>,
    pub user_errors: Vec<UserError>,
}

/// Result of submitting `productBundleCreate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSubmission {
    pub operation: Option<BundleOperation>,
    pub user_errors: Vec<UserError>,
}

/// A variant of a listed bundle product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedVariant {
    pub id: String,
    pub price: Option<String>,
}

/// A bundle product as shown in the bundle list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedBundle {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub tags: Vec<String>,
    pub variants: Vec<ListedVariant>,
}

impl ListedBundle {
    /// Whether the product carries the bundle tag.
    #[must_use]
    pub fn is_bundle(&self) -> bool {
        self.tags
            .iter()
            .any(|tag| tag.trim().eq_ignore_ascii_case(BUNDLE_TAG))
    }

    /// Price used for ordering: the first variant's price, or zero.
    #[must_use]
    pub fn sort_price(&self) -> Price {
        self.variants
            .first()
            .and_then(|v| v.price.as_deref())
            .map_or(Price::ZERO, Price::parse_lenient)
    }
}
