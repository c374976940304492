//! Bundle catalog operations for the Admin API.

use bundle_kit_core::{Price, ProductGid};
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    conversions::{
        convert_bundle_input, convert_bundle_operation, convert_bundle_submission,
        convert_listed_bundle, convert_product_node, convert_user_errors,
    },
    queries::{
        GetBundleProducts, GetFirstVariant, GetProductDetails, GetProductOperation,
        GetProductsCount, ProductBundleCreate, ProductVariantsBulkUpdate, UserErrorNode,
        get_bundle_products, get_first_variant, get_product_details, get_product_operation,
        get_products_count, product_bundle_create, product_variants_bulk_update,
    },
};
use crate::bundles::{
    BUNDLE_TAG, BundleCatalog, BundleCreateInput, BundleOperation, BundleSubmission, ListedBundle,
    ResolvedProduct,
};

/// Products fetched per listing page.
const BUNDLE_PAGE_SIZE: i64 = 50;

/// Upper bound on listing pages, so a runaway cursor cannot loop forever.
const MAX_BUNDLE_PAGES: usize = 20;

fn join_user_errors(errors: Vec<UserErrorNode>) -> String {
    convert_user_errors(errors)
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl BundleCatalog for AdminClient {
    #[instrument(skip_all, fields(count = ids.len()))]
    async fn product_details(
        &self,
        ids: &[ProductGid],
    ) -> Result<Vec<Option<ResolvedProduct>>, AdminShopifyError> {
        let variables = get_product_details::Variables {
            ids: ids.iter().map(ToString::to_string).collect(),
        };

        let response = self.execute::<GetProductDetails>(variables).await?;

        Ok(response
            .nodes
            .into_iter()
            .map(convert_product_node)
            .collect())
    }

    #[instrument(skip_all, fields(title = %input.title, components = input.components.len()))]
    async fn create_bundle(
        &self,
        input: &BundleCreateInput,
    ) -> Result<BundleSubmission, AdminShopifyError> {
        let variables = product_bundle_create::Variables {
            input: convert_bundle_input(input),
        };

        let response = self.execute::<ProductBundleCreate>(variables).await?;

        response
            .product_bundle_create
            .map(convert_bundle_submission)
            .ok_or_else(|| {
                AdminShopifyError::UnexpectedResponse(
                    "productBundleCreate returned no payload".to_string(),
                )
            })
    }

    #[instrument(skip(self))]
    async fn bundle_operation(
        &self,
        operation_id: &str,
    ) -> Result<BundleOperation, AdminShopifyError> {
        let variables = get_product_operation::Variables {
            id: operation_id.to_string(),
        };

        let response = self.execute::<GetProductOperation>(variables).await?;

        response
            .product_operation
            .map(|op| convert_bundle_operation(op, operation_id))
            .ok_or_else(|| AdminShopifyError::NotFound(operation_id.to_string()))
    }

    #[instrument(skip(self))]
    async fn first_variant_id(&self, product_id: &str) -> Result<Option<String>, AdminShopifyError> {
        let variables = get_first_variant::Variables {
            id: product_id.to_string(),
        };

        let response = self.execute::<GetFirstVariant>(variables).await?;

        let product = response
            .product
            .ok_or_else(|| AdminShopifyError::NotFound(product_id.to_string()))?;
        Ok(product.variants.into_nodes().next().map(|v| v.id))
    }

    #[instrument(skip(self), fields(price = %price))]
    async fn set_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: Price,
    ) -> Result<(), AdminShopifyError> {
        let variables = product_variants_bulk_update::Variables {
            product_id: product_id.to_string(),
            variants: vec![product_variants_bulk_update::ProductVariantsBulkInput {
                id: variant_id.to_string(),
                price: price.to_money_string(),
            }],
        };

        let response = self.execute::<ProductVariantsBulkUpdate>(variables).await?;

        let payload = response.product_variants_bulk_update.ok_or_else(|| {
            AdminShopifyError::UnexpectedResponse(
                "productVariantsBulkUpdate returned no payload".to_string(),
            )
        })?;
        if !payload.user_errors.is_empty() {
            return Err(AdminShopifyError::UserError(join_user_errors(
                payload.user_errors,
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn bundle_products(&self) -> Result<Vec<ListedBundle>, AdminShopifyError> {
        let mut bundles = Vec::new();
        let mut after = None;

        for page in 1..=MAX_BUNDLE_PAGES {
            let variables = get_bundle_products::Variables {
                first: BUNDLE_PAGE_SIZE,
                after: after.take(),
                query: Some(format!("tag:{BUNDLE_TAG}")),
            };

            let response = self.execute::<GetBundleProducts>(variables).await?;
            let page_info = response.products.page_info;
            bundles.extend(
                response
                    .products
                    .connection
                    .into_nodes()
                    .map(convert_listed_bundle),
            );

            if !page_info.has_next_page {
                return Ok(bundles);
            }
            after = page_info.end_cursor;
            if after.is_none() {
                return Ok(bundles);
            }
            tracing::debug!(page, fetched = bundles.len(), "Fetching next bundle page");
        }

        tracing::warn!(
            pages = MAX_BUNDLE_PAGES,
            fetched = bundles.len(),
            "Bundle listing truncated at page limit"
        );
        Ok(bundles)
    }

    #[instrument(skip(self))]
    async fn product_count(&self) -> Result<u64, AdminShopifyError> {
        let response = self
            .execute::<GetProductsCount>(get_products_count::Variables {})
            .await?;

        response.products_count.map(|c| c.count).ok_or_else(|| {
            AdminShopifyError::UnexpectedResponse("productsCount returned null".to_string())
        })
    }
}
