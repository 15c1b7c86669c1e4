//! Wire types for the chat completion API.
//!
//! Only the fields this app reads are modeled. Every level of the response
//! path `choices[0].message.content` is optional so that a short envelope
//! is reported by name instead of failing to deserialize.

use serde::{Deserialize, Serialize};
use shop_copilot_core::{Generation, MissingField};

use super::error::CompletionError;

/// A message in a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: String,
    /// The text of the message.
    pub content: String,
}

impl ChatMessage {
    /// A user-role message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for `/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// Model name (e.g., "gpt-4").
    pub model: String,
    /// Conversation; always a single user message here.
    pub messages: Vec<ChatMessage>,
}

/// Response envelope from `/chat/completions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatResponse {
    /// Completion choices, in order.
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
}

/// One completion choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    /// Generated message.
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

/// Message generated for a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMessage {
    /// Generated text; `null` when the model answered with something else.
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Take the first choice's message content.
    #[must_use]
    pub fn into_generation(self) -> Generation {
        let Some(choice) = self.choices.and_then(|c| c.into_iter().next()) else {
            return Generation::Missing(MissingField::Choices);
        };
        let Some(message) = choice.message else {
            return Generation::Missing(MissingField::Message);
        };
        message
            .content
            .map_or(Generation::Missing(MissingField::Content), Generation::Text)
    }
}

/// Parse a successful response body into a [`Generation`].
///
/// # Errors
///
/// Returns `CompletionError::Parse` if the body is not JSON, or if a field on
/// the content path has the wrong type. Absent fields are not errors.
pub fn parse_chat_response(body: &str) -> Result<Generation, CompletionError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::Parse(format!("Failed to parse response: {e}")))?;
    Ok(response.into_generation())
}
