//! End-to-end bundle creation.

use bundle_kit_core::{Price, legacy_id};
use tracing::instrument;

use super::cancel::Cancellation;
use super::catalog::BundleCatalog;
use super::composer::compose;
use super::error::BundleError;
use super::poller::{PollPolicy, poll_until_terminal};
use super::reconciler::{ReconcileError, reconcile_price};
use super::resolver::resolve_products;
use super::types::{BundleCreateInput, ProductReference};

/// Upper bound on products in one bundle.
pub const MAX_BUNDLE_PRODUCTS: usize = 30;

/// A validated request to create a bundle.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub title: String,
    pub products: Vec<ProductReference>,
    /// Total computed by the client, if it sent one. Only used for comparison.
    pub client_price: Option<Price>,
}

impl BundleRequest {
    /// Check the request before anything is sent to Shopify.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Validation`] for a blank title or an empty or
    /// oversized product list.
    pub fn validate(&self) -> Result<(), BundleError> {
        if self.title.trim().is_empty() {
            return Err(BundleError::Validation("title is required".to_string()));
        }
        if self.products.is_empty() {
            return Err(BundleError::Validation(
                "at least one product is required".to_string(),
            ));
        }
        if self.products.len() > MAX_BUNDLE_PRODUCTS {
            return Err(BundleError::Validation(format!(
                "a bundle can contain at most {MAX_BUNDLE_PRODUCTS} products"
            )));
        }
        Ok(())
    }

    /// Sum of the submitted product prices.
    #[must_use]
    pub fn aggregate_price(&self) -> Price {
        Price::aggregate(self.products.iter().map(|p| p.price.as_str()))
    }
}

/// The bundle product that was created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedBundle {
    /// Product GID.
    pub product_id: String,
    /// Link to the product in the Shopify admin.
    pub edit_url: String,
    pub price: Price,
}

impl CreatedBundle {
    /// Numeric product id, as used in admin URLs.
    #[must_use]
    pub fn numeric_id(&self) -> &str {
        legacy_id(&self.product_id)
    }
}

/// Outcome of a bundle creation that got as far as creating the product.
#[derive(Debug)]
pub enum BundleCreation {
    /// Created and priced.
    Complete(CreatedBundle),
    /// Created, but the price could not be set.
    PriceUnset {
        bundle: CreatedBundle,
        error: ReconcileError,
    },
}

impl BundleCreation {
    #[must_use]
    pub const fn bundle(&self) -> &CreatedBundle {
        match self {
            Self::Complete(bundle) | Self::PriceUnset { bundle, .. } => bundle,
        }
    }

    #[must_use]
    pub const fn price_set(&self) -> bool {
        matches!(self, Self::Complete(_))
    }
}

/// Admin URL for editing a product.
///
/// `shop` is the `*.myshopify.com` domain; only its subdomain is used.
#[must_use]
pub fn product_edit_url(shop: &str, product_id: &str) -> String {
    let store = shop.split('.').next().unwrap_or(shop);
    format!(
        "https://admin.shopify.com/store/{store}/products/{}",
        legacy_id(product_id)
    )
}

/// Runs the create flow against one shop's catalog.
pub struct BundleWorkflow<'a, C> {
    catalog: &'a C,
    shop: &'a str,
    policy: PollPolicy,
    cancel: &'a Cancellation,
}

impl<'a, C: BundleCatalog> BundleWorkflow<'a, C> {
    #[must_use]
    pub const fn new(
        catalog: &'a C,
        shop: &'a str,
        policy: PollPolicy,
        cancel: &'a Cancellation,
    ) -> Self {
        Self {
            catalog,
            shop,
            policy,
            cancel,
        }
    }

    /// Resolve, compose, submit, poll, then set the price.
    ///
    /// Each step runs only after the previous one succeeded.
    ///
    /// # Errors
    ///
    /// Returns a [`BundleError`] for any failure before the product exists.
    /// A failure to set the price is reported as
    /// [`BundleCreation::PriceUnset`] instead.
    #[instrument(skip_all, fields(shop = %self.shop, title = %request.title, products = request.products.len()))]
    pub async fn create(&self, request: &BundleRequest) -> Result<BundleCreation, BundleError> {
        request.validate()?;

        let price = request.aggregate_price();
        if let Some(client_price) = request.client_price
            && client_price != price
        {
            tracing::warn!(
                client_price = %client_price,
                computed_price = %price,
                "Client bundle price differs from computed total; using computed total"
            );
        }

        let resolved = resolve_products(self.catalog, &request.products).await?;
        let components = compose(&resolved)?;

        let input = BundleCreateInput {
            title: request.title.trim().to_string(),
            components,
        };
        let submission = self.catalog.create_bundle(&input).await?;
        if let Some(user_error) = submission.user_errors.first() {
            tracing::warn!(error = %user_error, "Bundle create rejected");
            return Err(BundleError::Mutation(user_error.message.clone()));
        }
        let operation = submission.operation.ok_or_else(|| {
            BundleError::Mutation("bundle create returned no operation".to_string())
        })?;
        tracing::info!(operation_id = %operation.id, "Bundle operation submitted");

        let product_id =
            poll_until_terminal(self.catalog, &operation.id, &self.policy, self.cancel).await?;

        let bundle = CreatedBundle {
            edit_url: product_edit_url(self.shop, &product_id),
            product_id,
            price,
        };

        match reconcile_price(self.catalog, &bundle.product_id, price).await {
            Ok(()) => {
                tracing::info!(product_id = %bundle.product_id, "Bundle created");
                Ok(BundleCreation::Complete(bundle))
            }
            Err(error) => {
                tracing::warn!(
                    product_id = %bundle.product_id,
                    error = %error,
                    "Bundle created but price could not be set"
                );
                Ok(BundleCreation::PriceUnset { bundle, error })
            }
        }
    }
}
