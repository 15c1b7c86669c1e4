//! Chat completion API client.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use shop_copilot_core::Generation;
use tracing::instrument;

use crate::config::OpenAIConfig;

use super::error::{ApiErrorResponse, CompletionError};
use super::types::{ChatMessage, ChatRequest, parse_chat_response};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_AFTER_SECS: u64 = 20;

/// Chat completion API client.
///
/// Sends one prompt per call and returns the first choice's text. No retry
/// and no backoff; the request timeout comes from configuration.
#[derive(Clone)]
pub struct CompletionClient {
    inner: Arc<CompletionClientInner>,
}

struct CompletionClientInner {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    url: String,
}

impl CompletionClient {
    /// Create a new completion client.
    ///
    /// # Errors
    ///
    /// Returns `CompletionError::ClientBuild` if the HTTP client cannot be
    /// constructed (e.g., TLS backend initialization failure).
    pub fn new(config: &OpenAIConfig) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| CompletionError::ClientBuild(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(CompletionClientInner {
                client,
                api_key: config.api_key.clone(),
                model: config.model.clone(),
                url: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            }),
        })
    }

    /// The model name sent with each request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Generate text for a prompt.
    ///
    /// The prompt is sent unmodified as a single user message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with a
    /// non-success status, or the body is not a JSON envelope. A JSON
    /// envelope without text yields `Ok(Generation::Missing(_))`.
    #[instrument(skip(self, prompt), fields(model = %self.inner.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<Generation, CompletionError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
        };

        let response = self
            .inner
            .client
            .post(&self.inner.url)
            .bearer_auth(self.inner.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(handle_error_status(status, response).await);
        }

        let body = response.text().await?;
        let generation = parse_chat_response(&body)?;
        if let Generation::Missing(field) = &generation {
            tracing::warn!(missing = %field, "Completion response had no text");
        }
        Ok(generation)
    }
}

/// Map an error status code to a `CompletionError`.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> CompletionError {
    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return CompletionError::RateLimited(retry_after);
    }

    // Check for unauthorized
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return CompletionError::Unauthorized("Invalid API key".to_string());
    }

    // Try to parse API error response
    match response.text().await {
        Ok(body) => match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_error) => CompletionError::Api {
                status: status.as_u16(),
                error_type: api_error
                    .error
                    .error_type
                    .unwrap_or_else(|| "unknown".to_string()),
                message: api_error.error.message,
            },
            Err(_) => CompletionError::Api {
                status: status.as_u16(),
                error_type: "unknown".to_string(),
                message: body,
            },
        },
        Err(e) => CompletionError::Http(e),
    }
}
