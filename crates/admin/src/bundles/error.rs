//! Bundle workflow errors.

use thiserror::Error;

use crate::shopify::AdminShopifyError;

/// Errors from creating or listing bundles.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The request itself is invalid; nothing was sent to Shopify.
    #[error("{0}")]
    Validation(String),

    /// One or more products could not be resolved; no mutation was issued.
    #[error("incomplete product data: could not resolve {}", .missing.join(", "))]
    Resolution { missing: Vec<String> },

    /// A resolved product cannot be expressed as a bundle component.
    #[error("product {product_id} option '{option}' has no values")]
    Composition { product_id: String, option: String },

    /// Shopify rejected the mutation; carries the first user error verbatim.
    #[error("{0}")]
    Mutation(String),

    /// The operation reached the failed state.
    #[error("bundle creation failed: {0}")]
    OperationFailed(String),

    /// The operation was still pending when the poll budget ran out.
    #[error(
        "bundle operation {operation_id} still pending after {attempts} polls ({elapsed_ms} ms)"
    )]
    TimedOut {
        operation_id: String,
        attempts: u32,
        elapsed_ms: u64,
    },

    /// Polling stopped because the server is shutting down.
    #[error("bundle operation {operation_id} polling was cancelled")]
    Cancelled { operation_id: String },

    /// A Shopify request failed outright.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),
}

impl BundleError {
    /// Stable machine-readable error kind, reported to clients.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Resolution { .. } => "resolution",
            Self::Composition { .. } => "composition",
            Self::Mutation(_) => "mutation",
            Self::OperationFailed(_) => "operation_failed",
            Self::TimedOut { .. } => "timed_out",
            Self::Cancelled { .. } => "cancelled",
            Self::Shopify(_) => "shopify",
        }
    }

    /// Whether the client caused the error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_message() {
        let err = BundleError::Resolution {
            missing: vec![
                "gid://shopify/Product/1".to_string(),
                "gid://shopify/Product/2".to_string(),
            ],
        };
        assert_eq!(
            err.to_string(),
            "incomplete product data: could not resolve gid://shopify/Product/1, gid://shopify/Product/2"
        );
        assert_eq!(err.kind(), "resolution");
    }

    #[test]
    fn test_mutation_message_is_verbatim() {
        let err = BundleError::Mutation("Title can't be blank".to_string());
        assert_eq!(err.to_string(), "Title can't be blank");
    }

    #[test]
    fn test_timed_out_is_distinct() {
        let err = BundleError::TimedOut {
            operation_id: "gid://shopify/ProductBundleOperation/9".to_string(),
            attempts: 3,
            elapsed_ms: 2000,
        };
        assert_eq!(err.kind(), "timed_out");
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("after 3 polls"));
    }

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(BundleError::Validation("title is required".to_string()).is_client_error());
        assert!(!BundleError::OperationFailed("x".to_string()).is_client_error());
        assert!(
            !BundleError::Cancelled {
                operation_id: "op".to_string()
            }
            .is_client_error()
        );
    }
}
