//! Chat completion API integration for product description generation.
//!
//! # Features
//!
//! - One user-role message per request, no conversation history
//! - OpenAI-compatible `/chat/completions` wire format
//! - Malformed envelopes surface as [`Generation::Missing`], not as errors
//!
//! [`Generation::Missing`]: shop_copilot_core::Generation::Missing

mod client;
mod error;
mod types;

pub use client::CompletionClient;
pub use error::CompletionError;
pub use types::{ChatMessage, ChatRequest, ChatResponse, parse_chat_response};
