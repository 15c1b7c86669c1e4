//! HTTP middleware and extractors for admin.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Embedded document headers (`frame-ancestors` CSP)
//!
//! Request authentication is an extractor ([`ShopifyAdmin`]) rather than a
//! layer, so only the routes that talk to the Admin API pay for it.

pub mod auth;
pub mod document_headers;

pub use auth::ShopifyAdmin;
pub use document_headers::embedded_document_headers;
