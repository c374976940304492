//! In-memory [`BundleCatalog`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use bundle_kit_core::{BundleOperationStatus, Price, ProductGid};

use super::catalog::BundleCatalog;
use super::types::{
    BundleCreateInput, BundleOperation, BundleSubmission, ListedBundle, ProductOption,
    ResolvedProduct, UserError,
};
use crate::shopify::AdminShopifyError;

pub const OPERATION_ID: &str = "gid://shopify/ProductBundleOperation/1";
pub const BUNDLE_PRODUCT_ID: &str = "gid://shopify/Product/900";
pub const BUNDLE_VARIANT_ID: &str = "gid://shopify/ProductVariant/901";

#[derive(Default)]
struct State {
    products: HashMap<String, ResolvedProduct>,
    create_user_errors: Vec<UserError>,
    statuses: VecDeque<BundleOperationStatus>,
    completed_product: Option<String>,
    first_variant: Option<String>,
    price_update_error: Option<String>,
    listed: Vec<ListedBundle>,
    product_count: u64,
    detail_calls: usize,
    create_calls: Vec<BundleCreateInput>,
    poll_calls: u32,
    price_updates: Vec<(String, String, Price)>,
}

/// Scripted catalog; clones share state.
#[derive(Clone, Default)]
pub struct FakeCatalog {
    state: Arc<Mutex<State>>,
}

impl FakeCatalog {
    /// A catalog that completes on the first poll.
    pub fn new() -> Self {
        let catalog = Self::default();
        catalog.with_state(|s| {
            s.statuses.push_back(BundleOperationStatus::Completed);
            s.completed_product = Some(BUNDLE_PRODUCT_ID.to_string());
            s.first_variant = Some(BUNDLE_VARIANT_ID.to_string());
        });
        catalog
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().expect("fake catalog lock poisoned");
        f(&mut state)
    }

    pub fn add_product(&self, numeric_id: u64) -> &Self {
        let id = format!("gid://shopify/Product/{numeric_id}");
        self.with_state(|s| {
            s.products.insert(
                id.clone(),
                ResolvedProduct {
                    id: id.clone(),
                    title: format!("Product {numeric_id}"),
                    options: vec![ProductOption {
                        id: format!("gid://shopify/ProductOption/{numeric_id}"),
                        name: "Size".to_string(),
                        values: vec!["S".to_string(), "M".to_string()],
                    }],
                    first_variant_id: Some(format!("gid://shopify/ProductVariant/{numeric_id}")),
                },
            );
        });
        self
    }

    pub fn reject_create(&self, message: &str) -> &Self {
        self.with_state(|s| {
            s.create_user_errors.push(UserError {
                field: Some(vec!["input".to_string()]),
                message: message.to_string(),
            });
        });
        self
    }

    /// Replace the scripted poll sequence; the last status repeats.
    pub fn script_statuses(&self, statuses: &[BundleOperationStatus]) -> &Self {
        self.with_state(|s| s.statuses = statuses.iter().copied().collect());
        self
    }

    pub fn complete_without_product(&self) -> &Self {
        self.with_state(|s| s.completed_product = None);
        self
    }

    pub fn without_variants(&self) -> &Self {
        self.with_state(|s| s.first_variant = None);
        self
    }

    pub fn fail_price_update(&self, message: &str) -> &Self {
        self.with_state(|s| s.price_update_error = Some(message.to_string()));
        self
    }

    pub fn set_listed(&self, listed: Vec<ListedBundle>) -> &Self {
        self.with_state(|s| s.listed = listed);
        self
    }

    pub fn set_product_count(&self, count: u64) -> &Self {
        self.with_state(|s| s.product_count = count);
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.with_state(|s| s.detail_calls)
    }

    pub fn create_calls(&self) -> Vec<BundleCreateInput> {
        self.with_state(|s| s.create_calls.clone())
    }

    pub fn poll_calls(&self) -> u32 {
        self.with_state(|s| s.poll_calls)
    }

    pub fn price_updates(&self) -> Vec<(String, String, Price)> {
        self.with_state(|s| s.price_updates.clone())
    }
}

impl BundleCatalog for FakeCatalog {
    async fn product_details(
        &self,
        ids: &[ProductGid],
    ) -> Result<Vec<Option<ResolvedProduct>>, AdminShopifyError> {
        Ok(self.with_state(|s| {
            s.detail_calls += 1;
            ids.iter()
                .map(|id| s.products.get(id.as_str()).cloned())
                .collect()
        }))
    }

    async fn create_bundle(
        &self,
        input: &BundleCreateInput,
    ) -> Result<BundleSubmission, AdminShopifyError> {
        Ok(self.with_state(|s| {
            s.create_calls.push(input.clone());
            if s.create_user_errors.is_empty() {
                BundleSubmission {
                    operation: Some(BundleOperation {
                        id: OPERATION_ID.to_string(),
                        status: BundleOperationStatus::Pending,
                        product_id: None,
                        user_errors: vec![],
                    }),
                    user_errors: vec![],
                }
            } else {
                BundleSubmission {
                    operation: None,
                    user_errors: s.create_user_errors.clone(),
                }
            }
        }))
    }

    async fn bundle_operation(
        &self,
        operation_id: &str,
    ) -> Result<BundleOperation, AdminShopifyError> {
        Ok(self.with_state(|s| {
            s.poll_calls += 1;
            let status = if s.statuses.len() > 1 {
                s.statuses.pop_front()
            } else {
                s.statuses.front().copied()
            }
            .unwrap_or(BundleOperationStatus::Pending);
            let completed = status == BundleOperationStatus::Completed;
            BundleOperation {
                id: operation_id.to_string(),
                status,
                product_id: s.completed_product.clone().filter(|_| completed),
                user_errors: if status == BundleOperationStatus::Failed {
                    vec![UserError {
                        field: None,
                        message: "Component product is archived".to_string(),
                    }]
                } else {
                    vec![]
                },
            }
        }))
    }

    async fn first_variant_id(&self, _product_id: &str) -> Result<Option<String>, AdminShopifyError> {
        Ok(self.with_state(|s| s.first_variant.clone()))
    }

    async fn set_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: Price,
    ) -> Result<(), AdminShopifyError> {
        self.with_state(|s| {
            if let Some(message) = &s.price_update_error {
                return Err(AdminShopifyError::UserError(message.clone()));
            }
            s.price_updates
                .push((product_id.to_string(), variant_id.to_string(), price));
            Ok(())
        })
    }

    async fn bundle_products(&self) -> Result<Vec<ListedBundle>, AdminShopifyError> {
        Ok(self.with_state(|s| s.listed.clone()))
    }

    async fn product_count(&self) -> Result<u64, AdminShopifyError> {
        Ok(self.with_state(|s| s.product_count))
    }
}
