//! Turns resolved products into bundle components.

use super::error::BundleError;
use super::types::{BundleComponent, OptionSelection, ResolvedProduct};

/// Quantity of each product in a bundle.
const COMPONENT_QUANTITY: u32 = 1;

/// Build one component per product, selecting the first value of every option.
///
/// Variants that differ only in a later option value cannot be told apart;
/// the bundle always references the first value of each axis.
///
/// # Errors
///
/// Returns [`BundleError::Composition`] if a product has an option with no values.
pub fn compose(products: &[ResolvedProduct]) -> Result<Vec<BundleComponent>, BundleError> {
    products.iter().map(compose_one).collect()
}

fn compose_one(product: &ResolvedProduct) -> Result<BundleComponent, BundleError> {
    let option_selections = product
        .options
        .iter()
        .map(|option| {
            let value = option
                .values
                .first()
                .ok_or_else(|| BundleError::Composition {
                    product_id: product.id.clone(),
                    option: option.name.clone(),
                })?;
            Ok(OptionSelection {
                component_option_id: option.id.clone(),
                name: option.name.clone(),
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<_>, BundleError>>()?;

    Ok(BundleComponent {
        product_id: product.id.clone(),
        quantity: COMPONENT_QUANTITY,
        option_selections,
    })
}
