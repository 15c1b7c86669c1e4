//! Shop Copilot Core - Shared types library.
//!
//! This crate provides the domain types used by the `admin` binary and its
//! integration tests:
//! - [`ProductId`] and [`ProductSummary`] for the product search relay
//! - [`Generation`] and [`MissingField`] for the description generator relay
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Wire formats
//! of the upstream APIs live next to their clients in `admin`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
