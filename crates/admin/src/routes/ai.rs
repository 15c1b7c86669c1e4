//! Product description generator page.
//!
//! The form posts back to `/ai`, which calls the completion API directly and
//! renders the outcome in place.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use shop_copilot_core::Generation;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

use super::app::ShellView;

/// Form fields posted by the generator page.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    pub prompt: Option<String>,
}

/// What to show under the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing submitted yet.
    Empty,
    /// Generated text, shown verbatim.
    Generated(String),
    /// The API answered without any text.
    NoText,
    /// The API call failed.
    Failed,
}

/// Generator page template.
#[derive(Template, WebTemplate)]
#[template(path = "ai/index.html")]
pub struct AiPageTemplate {
    pub shell: ShellView,
    pub prompt: String,
    pub outcome: Outcome,
}

/// Build the generator router.
pub fn router() -> Router<AppState> {
    Router::new().route("/ai", get(page).post(generate))
}

/// GET /ai - empty form.
async fn page(State(state): State<AppState>) -> AiPageTemplate {
    AiPageTemplate {
        shell: ShellView::new(&state, "/ai"),
        prompt: String::new(),
        outcome: Outcome::Empty,
    }
}

/// POST /ai - generate and render.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the `prompt` field is absent.
#[instrument(skip_all)]
async fn generate(
    State(state): State<AppState>,
    Form(form): Form<GenerateForm>,
) -> Result<Response, AppError> {
    let prompt = form
        .prompt
        .ok_or_else(|| AppError::BadRequest("prompt is required".to_string()))?;

    let (status, outcome) = match state.completion().generate(&prompt).await {
        Ok(Generation::Text(text)) => (StatusCode::OK, Outcome::Generated(text)),
        Ok(Generation::Missing(_)) => (StatusCode::OK, Outcome::NoText),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Description generation failed");
            (StatusCode::BAD_GATEWAY, Outcome::Failed)
        }
    };

    let template = AiPageTemplate {
        shell: ShellView::new(&state, "/ai"),
        prompt,
        outcome,
    };
    Ok((status, template).into_response())
}
