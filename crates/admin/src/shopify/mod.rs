//! Shopify Admin API client.
//!
//! # Security
//!
//! The offline Admin API token grants write access to the store's products.
//! It is only used server-side and never leaves this process.
//!
//! # Architecture
//!
//! - Uses the `graphql_client` request envelope with hand-written operations
//! - Direct API calls to Shopify (no local catalog sync)
//! - One [`AdminClient`] per authenticated request, built by
//!   [`ShopifyCatalogProvider`] from the request's shop session
//!
//! # Example
//!
//! ```rust,ignore
//! use bundle_kit_admin::bundles::{BundleCatalog, CatalogProvider};
//!
//! let catalog = state.catalogs().for_session(&session);
//! let count = catalog.product_count().await?;
//! ```

mod admin;

pub use admin::{AdminClient, ShopifyCatalogProvider};

use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_errors_are_joined() {
        let errors = ["Field 'bundle' doesn't exist", "Invalid ID"]
            .into_iter()
            .map(|message| GraphQLError {
                message: message.to_string(),
                locations: vec![GraphQLErrorLocation { line: 2, column: 3 }],
                path: vec![],
            })
            .collect();
        assert_eq!(
            AdminShopifyError::GraphQL(errors).to_string(),
            "GraphQL errors: Field 'bundle' doesn't exist; Invalid ID"
        );
    }

    #[test]
    fn test_workflow_error_messages() {
        let cases = [
            (
                AdminShopifyError::NotFound("gid://shopify/ProductBundleOperation/9".to_string()),
                "Not found: gid://shopify/ProductBundleOperation/9",
            ),
            (
                AdminShopifyError::RateLimited(2),
                "Rate limited, retry after 2 seconds",
            ),
            (
                AdminShopifyError::Unauthorized("Invalid API key or access token".to_string()),
                "Unauthorized: Invalid API key or access token",
            ),
            (
                AdminShopifyError::UserError("Components must not be empty".to_string()),
                "User error: Components must not be empty",
            ),
            (
                AdminShopifyError::UnexpectedResponse(
                    "productBundleCreate returned no operation".to_string(),
                ),
                "Unexpected response: productBundleCreate returned no operation",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }
}
