//! Integration tests for Bundle Kit.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bundle-kit-integration-tests
//! ```
//!
//! The tests drive the full router (middleware, session-token auth, handlers)
//! in-process with `tower::ServiceExt::oneshot`. Shopify is replaced by a
//! [`ScriptedCatalog`] and the feedback store by an in-memory `SQLite` pool,
//! so no network or external services are needed.
//!
//! # Test Categories
//!
//! - `bundles_api` - Bundle creation and listing
//! - `feedback_api` - Feedback storage
//! - `platform` - Health checks, auth, headers, product count

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use sqlx::SqlitePool;
use tower::ServiceExt;

use bundle_kit_admin::bundles::{
    BundleCatalog, BundleCreateInput, BundleOperation, BundleSubmission, Cancellation,
    CancellationHandle, CatalogProvider, ListedBundle, ListedVariant, ProductOption,
    ResolvedProduct, UserError,
};
use bundle_kit_admin::config::{AppConfig, BundleConfig, ShopifyAppConfig};
use bundle_kit_admin::db;
use bundle_kit_admin::middleware::SessionTokenVerifier;
use bundle_kit_admin::models::ShopSession;
use bundle_kit_admin::routes;
use bundle_kit_admin::shopify::AdminShopifyError;
use bundle_kit_admin::state::AppState;
use bundle_kit_core::{BundleOperationStatus, Price, ProductGid};

pub const STORE: &str = "bundle-demo.myshopify.com";
pub const API_KEY: &str = "integration-api-key";
pub const BUNDLE_PRODUCT_ID: &str = "gid://shopify/Product/7001";
const BUNDLE_VARIANT_ID: &str = "gid://shopify/ProductVariant/7002";
const OPERATION_ID: &str = "gid://shopify/ProductBundleOperation/55";

// =============================================================================
// Scripted Shopify catalog
// =============================================================================

/// How the scripted shop behaves. Built once per test.
#[derive(Debug, Clone)]
pub struct Script {
    /// Products that resolve, keyed by numeric id.
    pub products: HashMap<u64, ResolvedProduct>,
    /// Status returned by each successive poll; the last one repeats.
    pub statuses: Vec<BundleOperationStatus>,
    /// User errors returned by `productBundleCreate`.
    pub create_errors: Vec<String>,
    /// Whether the created product has a variant to price.
    pub bundle_has_variant: bool,
    /// Error returned when setting the price.
    pub price_error: Option<String>,
    /// Products returned by the bundle search.
    pub listed: Vec<ListedBundle>,
    pub product_count: u64,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            products: HashMap::new(),
            statuses: vec![
                BundleOperationStatus::Pending,
                BundleOperationStatus::Completed,
            ],
            create_errors: vec![],
            bundle_has_variant: true,
            price_error: None,
            listed: vec![],
            product_count: 0,
        }
    }
}

impl Script {
    /// Add a product with one "Color" option.
    #[must_use]
    pub fn with_product(mut self, numeric_id: u64, colors: &[&str]) -> Self {
        let gid = format!("gid://shopify/Product/{numeric_id}");
        self.products.insert(
            numeric_id,
            ResolvedProduct {
                id: gid,
                title: format!("Item {numeric_id}"),
                options: vec![ProductOption {
                    id: format!("gid://shopify/ProductOption/{numeric_id}1"),
                    name: "Color".to_string(),
                    values: colors.iter().map(ToString::to_string).collect(),
                }],
                first_variant_id: Some(format!("gid://shopify/ProductVariant/{numeric_id}1")),
            },
        );
        self
    }

    #[must_use]
    pub fn with_statuses(mut self, statuses: &[BundleOperationStatus]) -> Self {
        self.statuses = statuses.to_vec();
        self
    }
}

/// Calls the catalog received.
#[derive(Debug, Clone, Default)]
pub struct Calls {
    pub lookups: Vec<Vec<String>>,
    pub creates: Vec<BundleCreateInput>,
    pub polls: usize,
    pub price_updates: Vec<(String, String, Price)>,
}

/// A [`BundleCatalog`] that plays back a [`Script`] and records calls.
#[derive(Debug, Clone)]
pub struct ScriptedCatalog {
    script: Arc<Script>,
    calls: Arc<Mutex<Calls>>,
}

impl ScriptedCatalog {
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self {
            script: Arc::new(script),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }

    /// Snapshot of the calls so far.
    #[must_use]
    pub fn calls(&self) -> Calls {
        self.record(|calls| calls.clone())
    }

    fn record<R>(&self, f: impl FnOnce(&mut Calls) -> R) -> R {
        let mut calls = self.calls.lock().expect("calls lock poisoned");
        f(&mut calls)
    }
}

impl BundleCatalog for ScriptedCatalog {
    async fn product_details(
        &self,
        ids: &[ProductGid],
    ) -> Result<Vec<Option<ResolvedProduct>>, AdminShopifyError> {
        self.record(|c| {
            c.lookups
                .push(ids.iter().map(|id| id.as_str().to_string()).collect());
        });
        Ok(ids
            .iter()
            .map(|id| {
                id.numeric_id()
                    .parse::<u64>()
                    .ok()
                    .and_then(|n| self.script.products.get(&n).cloned())
            })
            .collect())
    }

    async fn create_bundle(
        &self,
        input: &BundleCreateInput,
    ) -> Result<BundleSubmission, AdminShopifyError> {
        self.record(|c| c.creates.push(input.clone()));

        if !self.script.create_errors.is_empty() {
            return Ok(BundleSubmission {
                operation: None,
                user_errors: self
                    .script
                    .create_errors
                    .iter()
                    .map(|message| UserError {
                        field: Some(vec!["input".to_string(), "title".to_string()]),
                        message: message.clone(),
                    })
                    .collect(),
            });
        }

        Ok(BundleSubmission {
            operation: Some(BundleOperation {
                id: OPERATION_ID.to_string(),
                status: BundleOperationStatus::Pending,
                product_id: None,
                user_errors: vec![],
            }),
            user_errors: vec![],
        })
    }

    async fn bundle_operation(
        &self,
        operation_id: &str,
    ) -> Result<BundleOperation, AdminShopifyError> {
        let poll = self.record(|c| {
            c.polls += 1;
            c.polls
        });
        let status = self
            .script
            .statuses
            .get(poll - 1)
            .or_else(|| self.script.statuses.last())
            .copied()
            .unwrap_or(BundleOperationStatus::Pending);

        Ok(BundleOperation {
            id: operation_id.to_string(),
            status,
            product_id: (status == BundleOperationStatus::Completed)
                .then(|| BUNDLE_PRODUCT_ID.to_string()),
            user_errors: if status == BundleOperationStatus::Failed {
                vec![UserError {
                    field: None,
                    message: "Bundle components are invalid".to_string(),
                }]
            } else {
                vec![]
            },
        })
    }

    async fn first_variant_id(&self, _product_id: &str) -> Result<Option<String>, AdminShopifyError> {
        Ok(self
            .script
            .bundle_has_variant
            .then(|| BUNDLE_VARIANT_ID.to_string()))
    }

    async fn set_variant_price(
        &self,
        product_id: &str,
        variant_id: &str,
        price: Price,
    ) -> Result<(), AdminShopifyError> {
        if let Some(message) = &self.script.price_error {
            return Err(AdminShopifyError::UserError(message.clone()));
        }
        self.record(|c| {
            c.price_updates
                .push((product_id.to_string(), variant_id.to_string(), price));
        });
        Ok(())
    }

    async fn bundle_products(&self) -> Result<Vec<ListedBundle>, AdminShopifyError> {
        Ok(self.script.listed.clone())
    }

    async fn product_count(&self) -> Result<u64, AdminShopifyError> {
        Ok(self.script.product_count)
    }
}

/// Hands every session the same scripted catalog.
#[derive(Debug, Clone)]
pub struct ScriptedProvider {
    catalog: ScriptedCatalog,
}

impl CatalogProvider for ScriptedProvider {
    type Catalog = ScriptedCatalog;

    fn for_session(&self, session: &ShopSession) -> Self::Catalog {
        assert_eq!(session.shop, STORE, "catalog requested for another shop");
        self.catalog.clone()
    }
}

/// A listed product with a single priced variant.
#[must_use]
pub fn listed(id: u64, price: Option<&str>, tags: &[&str]) -> ListedBundle {
    ListedBundle {
        id: format!("gid://shopify/Product/{id}"),
        title: format!("Bundle {id}"),
        handle: format!("bundle-{id}"),
        tags: tags.iter().map(ToString::to_string).collect(),
        variants: vec![ListedVariant {
            id: format!("gid://shopify/ProductVariant/{id}"),
            price: price.map(str::to_string),
        }],
    }
}

// =============================================================================
// Test application
// =============================================================================

/// Configuration with fast polling for tests.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: SecretString::from("sqlite::memory:"),
        run_migrations: false,
        host: [127, 0, 0, 1].into(),
        port: 0,
        shopify: ShopifyAppConfig {
            store: STORE.to_string(),
            api_version: "2025-01".to_string(),
            api_key: API_KEY.to_string(),
            api_secret: SecretString::from("Tq8vN3kW6zR1mB5xL9cJ2hF7"),
            access_token: SecretString::from("shpat_unused_in_tests"),
        },
        bundles: BundleConfig {
            poll_interval: Duration::from_millis(5),
            poll_max_attempts: 20,
            poll_timeout: Duration::from_secs(5),
            max_concurrent_creations: 2,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The router under test plus handles to its collaborators.
pub struct TestApp {
    router: Router,
    pub catalog: ScriptedCatalog,
    pub pool: SqlitePool,
    pub tokens: SessionTokenVerifier,
    pub shutdown: CancellationHandle,
}

impl TestApp {
    pub async fn new(script: Script) -> Self {
        Self::with_config(script, test_config()).await
    }

    pub async fn with_config(script: Script, config: AppConfig) -> Self {
        let pool = db::create_in_memory_pool()
            .await
            .expect("in-memory database");
        let catalog = ScriptedCatalog::new(script);
        let tokens = SessionTokenVerifier::new(&config.shopify);
        let (shutdown, cancellation) = Cancellation::new();

        let state = AppState::new(
            config,
            pool.clone(),
            ScriptedProvider {
                catalog: catalog.clone(),
            },
            cancellation,
        );
        let router = routes::app(state).expect("router");

        Self {
            router,
            catalog,
            pool,
            tokens,
            shutdown,
        }
    }

    /// A valid session token for the configured store.
    #[must_use]
    pub fn token(&self) -> String {
        self.tokens
            .issue(chrono::Utc::now().timestamp())
            .expect("sign session token")
    }

    /// Send a request with a valid session token.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let token = self.token();
        self.call_with_auth(method, path, body, Some(&token)).await
    }

    /// Send a request with an explicit (or no) bearer token.
    pub async fn call_with_auth(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("request")).await
    }

    /// Send a prepared request.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("infallible router");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

        TestResponse {
            status,
            headers,
            json,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Number of stored feedback rows.
    pub async fn feedback_rows(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM feedback")
            .fetch_one(&self.pool)
            .await
            .expect("count feedback")
    }
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub json: serde_json::Value,
    pub text: String,
}
