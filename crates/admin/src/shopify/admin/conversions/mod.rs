//! Type conversions from GraphQL response types to domain types.
//!
//! These functions convert the operation response types in
//! [`super::queries`] into the bundle workflow's types.

mod bundles;

pub use bundles::{
    convert_bundle_input, convert_bundle_operation, convert_bundle_submission,
    convert_listed_bundle, convert_product_node, convert_user_errors,
};
