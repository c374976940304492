//! Shopify Admin API GraphQL client.
//!
//! This module provides a type-safe client for the handful of Admin API
//! operations the bundle workflow needs.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};

use crate::bundles::CatalogProvider;
use crate::config::ShopifyAppConfig;
use crate::models::ShopSession;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod bundles;
mod conversions;
pub mod queries;

/// Timeout for a single Admin API request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shopify Admin API GraphQL client for one shop.
///
/// # Security
///
/// Holds the shop's offline access token, which can write products.
/// The token is never logged.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    shop: String,
    endpoint: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("shop", &self.inner.shop)
            .field("endpoint", &self.inner.endpoint)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a client for `shop` (a `*.myshopify.com` domain).
    ///
    /// `client` is shared across shops; it carries the connection pool.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        shop: &str,
        api_version: &str,
        access_token: SecretString,
    ) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client,
                shop: shop.to_string(),
                endpoint: format!("https://{shop}/admin/api/{api_version}/graphql.json"),
                access_token,
            }),
        }
    }

    /// Get the shop domain.
    #[must_use]
    pub fn shop(&self) -> &str {
        &self.inner.shop
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split('.').next()?.parse().ok())
                .unwrap_or(2);
            tracing::warn!(operation = body.operation_name, retry_after, "Shopify rate limit hit");
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or revoked access token".to_string(),
            ));
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            AdminShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }
}

/// Builds an [`AdminClient`] for each authenticated request.
///
/// Uses the app's offline access token for the session's shop.
#[derive(Clone)]
pub struct ShopifyCatalogProvider {
    client: reqwest::Client,
    api_version: String,
    access_token: SecretString,
}

impl ShopifyCatalogProvider {
    /// Create a provider from app configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ShopifyAppConfig) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_version: config.api_version.clone(),
            access_token: config.access_token.clone(),
        })
    }
}

impl CatalogProvider for ShopifyCatalogProvider {
    type Catalog = AdminClient;

    fn for_session(&self, session: &ShopSession) -> AdminClient {
        AdminClient::new(
            self.client.clone(),
            &session.shop,
            &self.api_version,
            self.access_token.clone(),
        )
    }
}
