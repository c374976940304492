//! Unified error handling for the HTTP API.
//!
//! Every error is rendered as a JSON body with at least a `message` field,
//! which is what the embedded admin UI displays.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::bundles::BundleError;
use crate::db::RepositoryError;
use crate::shopify::AdminShopifyError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] AdminShopifyError),

    /// Bundle creation failed.
    #[error("Bundle error: {0}")]
    Bundle(#[from] BundleError),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Too many bundle creations already in flight.
    #[error("Too many bundle creations in progress, try again shortly")]
    TooManyRequests,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Bundle(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::Shopify(AdminShopifyError::RateLimited(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Shopify(_) => StatusCode::BAD_GATEWAY,
            Self::Database(_) | Self::Bundle(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match &self {
            Self::Bundle(e) if e.is_client_error() => ErrorBody {
                message: &e.to_string(),
                error: None,
                kind: Some(e.kind()),
            }
            .into_json(),
            Self::Bundle(e) => ErrorBody {
                message: "Failed to create bundle",
                error: Some(e.to_string()),
                kind: Some(e.kind()),
            }
            .into_json(),
            Self::Database(e) => ErrorBody {
                message: "Database request failed",
                error: Some(e.to_string()),
                kind: None,
            }
            .into_json(),
            Self::Shopify(e) => ErrorBody {
                message: "Shopify request failed",
                error: Some(e.to_string()),
                kind: None,
            }
            .into_json(),
            // Don't expose internal error details to clients
            Self::Internal(_) => ErrorBody {
                message: "Internal server error",
                error: None,
                kind: None,
            }
            .into_json(),
            Self::BadRequest(_) | Self::TooManyRequests => ErrorBody {
                message: &self.to_string(),
                error: None,
                kind: None,
            }
            .into_json(),
        };

        (status, body).into_response()
    }
}

impl ErrorBody<'_> {
    fn into_json(self) -> Json<serde_json::Value> {
        Json(serde_json::to_value(&self).unwrap_or_else(|_| {
            serde_json::json!({ "message": self.message })
        }))
    }
}
