//! Error types for the completion API client.

use thiserror::Error;

/// Errors that can occur when interacting with the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// HTTP client could not be constructed.
    #[error("HTTP client build error: {0}")]
    ClientBuild(String),

    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Completion API returned an error.
    #[error("API error ({status}, {error_type}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error type from the API.
        error_type: String,
        /// Error message.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Response body was not JSON of the envelope's types.
    #[error("parse error: {0}")]
    Parse(String),
}

/// API error response body.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Error message.
    pub message: String,
    /// Error type, e.g. `invalid_request_error`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}
