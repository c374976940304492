//! Bundle-related conversions.

use bundle_kit_core::BundleOperationStatus;

use crate::bundles::{
    BundleCreateInput, BundleOperation, BundleSubmission, ListedBundle, ListedVariant,
    ProductOption, ResolvedProduct, UserError,
};

use crate::shopify::admin::queries::{
    UserErrorNode, get_bundle_products, get_product_details, get_product_operation,
    product_bundle_create,
};

/// Convert one `nodes(ids:)` entry; anything but a product becomes `None`.
pub fn convert_product_node(node: Option<get_product_details::Node>) -> Option<ResolvedProduct> {
    match node? {
        get_product_details::Node::Product(product) => Some(ResolvedProduct {
            id: product.id,
            title: product.title,
            options: product
                .options
                .into_iter()
                .map(|o| ProductOption {
                    id: o.id,
                    name: o.name,
                    values: o.values,
                })
                .collect(),
            first_variant_id: product.variants.into_nodes().next().map(|v| v.id),
        }),
        get_product_details::Node::Other => None,
    }
}

pub fn convert_user_errors(errors: Vec<UserErrorNode>) -> Vec<UserError> {
    errors
        .into_iter()
        .map(|e| UserError {
            field: e.field,
            message: e.message,
        })
        .collect()
}

/// Map a raw operation status, treating unknown values as still pending.
fn convert_status(raw: &str) -> BundleOperationStatus {
    BundleOperationStatus::from_shopify(raw).unwrap_or_else(|| {
        tracing::warn!(status = raw, "Unknown bundle operation status, treating as pending");
        BundleOperationStatus::Pending
    })
}

pub fn convert_bundle_input(input: &BundleCreateInput) -> product_bundle_create::ProductBundleCreateInput {
    product_bundle_create::ProductBundleCreateInput {
        title: input.title.clone(),
        components: input
            .components
            .iter()
            .map(|c| product_bundle_create::ProductBundleComponentInput {
                product_id: c.product_id.clone(),
                quantity: c.quantity,
                option_selections: c
                    .option_selections
                    .iter()
                    .map(|s| product_bundle_create::OptionSelectionInput {
                        component_option_id: s.component_option_id.clone(),
                        name: s.name.clone(),
                        values: vec![s.value.clone()],
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub fn convert_bundle_submission(payload: product_bundle_create::Payload) -> BundleSubmission {
    BundleSubmission {
        operation: payload.product_bundle_operation.map(|op| BundleOperation {
            status: convert_status(&op.status),
            id: op.id,
            product_id: None,
            user_errors: Vec::new(),
        }),
        user_errors: convert_user_errors(payload.user_errors),
    }
}

/// Convert a polled operation.
///
/// `requested_id` fills in the id when the operation is not returned as a
/// `ProductBundleOperation`.
pub fn convert_bundle_operation(
    operation: get_product_operation::Operation,
    requested_id: &str,
) -> BundleOperation {
    BundleOperation {
        id: operation.id.unwrap_or_else(|| requested_id.to_string()),
        status: convert_status(&operation.status),
        product_id: operation.product.map(|p| p.id),
        user_errors: convert_user_errors(operation.user_errors),
    }
}

pub fn convert_listed_bundle(product: get_bundle_products::ProductNode) -> ListedBundle {
    ListedBundle {
        id: product.id,
        title: product.title,
        handle: product.handle,
        tags: product.tags,
        variants: product
            .variants
            .into_nodes()
            .map(|v| ListedVariant {
                id: v.id,
                price: v.price,
            })
            .collect(),
    }
}
