//! Core types for Shop Copilot.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod generation;
pub mod id;
pub mod product;

pub use generation::{Generation, MissingField};
pub use id::ProductId;
pub use product::ProductSummary;
