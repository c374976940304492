//! Bundle route handlers.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bundle_kit_core::{Price, ProductGid};

use crate::bundles::{
    BundleCreation, BundleRequest, BundleWorkflow, CatalogProvider, ListedBundle, ProductReference,
    list_bundles,
};
use crate::error::AppError;
use crate::models::ShopSession;
use crate::state::AppState;

pub fn router<P: CatalogProvider>() -> Router<AppState<P>> {
    Router::new()
        .route("/api/save-bundle", post(save_bundle::<P>))
        .route("/api/get-bundles", get(get_bundles::<P>))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// A JSON value the admin UI may send as either a string or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A product picked in the resource picker.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProduct {
    pub id: Scalar,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_src: String,
    #[serde(default)]
    pub price: Option<Scalar>,
}

/// Body of `POST /api/save-bundle`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBundleRequest {
    #[serde(default)]
    pub title: String,
    /// Total as computed by the client.
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub selected_products: Vec<SelectedProduct>,
}

impl TryFrom<SaveBundleRequest> for BundleRequest {
    type Error = AppError;

    fn try_from(body: SaveBundleRequest) -> Result<Self, Self::Error> {
        let products = body
            .selected_products
            .into_iter()
            .map(|product| {
                let raw_id = product.id.to_string();
                let id = ProductGid::parse(&raw_id)
                    .map_err(|e| AppError::BadRequest(format!("Invalid product id: {e}")))?;
                Ok(ProductReference {
                    id,
                    title: product.title,
                    image_src: product.image_src,
                    price: product.price.map(|p| p.to_string()).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok(Self {
            title: body.title,
            products,
            client_price: body.price.and_then(|p| Price::parse(&p.to_string()).ok()),
        })
    }
}

/// Body of a successful `POST /api/save-bundle`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBundleResponse {
    pub message: &'static str,
    /// Numeric product id.
    pub product_id: String,
    pub product_edit_url: String,
    pub price: String,
    pub price_set: bool,
    /// Why the price could not be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<BundleCreation> for SaveBundleResponse {
    fn from(creation: BundleCreation) -> Self {
        let price_set = creation.price_set();
        let (bundle, error) = match creation {
            BundleCreation::Complete(bundle) => (bundle, None),
            BundleCreation::PriceUnset { bundle, error } => (bundle, Some(error.to_string())),
        };

        Self {
            message: if price_set {
                "Bundle created successfully"
            } else {
                "Bundle created, but its price could not be set"
            },
            product_id: bundle.numeric_id().to_string(),
            product_edit_url: bundle.edit_url,
            price: bundle.price.to_money_string(),
            price_set,
            error,
        }
    }
}

/// Body of `GET /api/get-bundles`.
#[derive(Debug, Serialize)]
pub struct GetBundlesResponse {
    pub bundles: Vec<ListedBundle>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a bundle from the selected products.
///
/// # Errors
///
/// Returns 400 for an invalid body, 429 when too many creations are in
/// flight, and 500 when the bundle could not be created.
#[instrument(skip_all)]
pub async fn save_bundle<P: CatalogProvider>(
    session: ShopSession,
    State(state): State<AppState<P>>,
    body: Result<Json<SaveBundleRequest>, JsonRejection>,
) -> Result<Json<SaveBundleResponse>, AppError> {
    let Json(body) = body.map_err(|e| {
        tracing::debug!(error = %e, "Rejected bundle request body");
        AppError::BadRequest("Invalid data".to_string())
    })?;
    let request = BundleRequest::try_from(body)?;
    request.validate()?;

    let Some(_slot) = state.try_acquire_creation_slot() else {
        tracing::warn!(shop = %session.shop, "Bundle creation limit reached");
        return Err(AppError::TooManyRequests);
    };

    let catalog = state.catalogs().for_session(&session);
    let workflow = BundleWorkflow::new(
        &catalog,
        &session.shop,
        state.poll_policy(),
        state.cancellation(),
    );
    let creation = workflow.create(&request).await?;

    Ok(Json(creation.into()))
}

/// List bundle products, most expensive first.
///
/// # Errors
///
/// Returns an error if the Shopify request fails.
#[instrument(skip_all)]
pub async fn get_bundles<P: CatalogProvider>(
    session: ShopSession,
    State(state): State<AppState<P>>,
) -> Result<Json<GetBundlesResponse>, AppError> {
    let catalog = state.catalogs().for_session(&session);
    let bundles = list_bundles(&catalog).await?;
    Ok(Json(GetBundlesResponse { bundles }))
}
