//! Description generation API handler.

use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};
use shop_copilot_core::Generation;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

/// Build the description generation router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/generate-description", post(generate_description))
}

/// Request body for description generation.
#[derive(Debug, Deserialize)]
pub struct GenerationRequest {
    pub prompt: Option<String>,
}

/// Response body for description generation.
///
/// `result` is omitted when no text could be obtained.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Generate a product description from a prompt.
///
/// Upstream failures and malformed upstream envelopes both answer
/// `{}` (no `result`) with status 200; only a missing `prompt` is rejected.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `prompt` is absent.
#[instrument(skip(state, body))]
pub async fn generate_description(
    State(state): State<AppState>,
    Json(body): Json<GenerationRequest>,
) -> Result<Json<GenerationResponse>, AppError> {
    let prompt = body
        .prompt
        .ok_or_else(|| AppError::BadRequest("prompt is required".to_string()))?;

    let response = match state.completion().generate(&prompt).await {
        Ok(generation) => GenerationResponse::from(generation),
        Err(e) => {
            tracing::warn!("Description generation failed: {e}");
            GenerationResponse { result: None }
        }
    };

    Ok(Json(response))
}

impl From<Generation> for GenerationResponse {
    fn from(generation: Generation) -> Self {
        Self {
            result: generation.into_text(),
        }
    }
}
