//! Feedback route handler.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use bundle_kit_core::FeedbackKind;

use crate::bundles::CatalogProvider;
use crate::db::FeedbackRepository;
use crate::error::AppError;
use crate::models::ShopSession;
use crate::state::AppState;

pub fn router<P: CatalogProvider>() -> Router<AppState<P>> {
    Router::new().route("/api/feedback", post(save_feedback::<P>))
}

/// Body of `POST /api/feedback`.
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Store one thumbs up / thumbs down.
///
/// # Errors
///
/// Returns 400 when the body or feedback type is invalid.
#[instrument(skip_all, fields(shop = %session.shop))]
pub async fn save_feedback<P: CatalogProvider>(
    session: ShopSession,
    State(state): State<AppState<P>>,
    body: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let kind = body
        .ok()
        .and_then(|Json(body)| body.kind.parse::<FeedbackKind>().ok())
        .ok_or_else(|| AppError::BadRequest("Invalid feedback type".to_string()))?;

    match FeedbackRepository::new(state.pool()).insert(kind).await {
        Ok(record) => {
            tracing::info!(feedback_id = %record.id, kind = %record.kind, "Feedback saved");
            Ok(Json(FeedbackResponse {
                message: "Feedback saved successfully",
                error: None,
            })
            .into_response())
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to save feedback");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(FeedbackResponse {
                    message: "Failed to save feedback",
                    error: Some(e.to_string()),
                }),
            )
                .into_response())
        }
    }
}
