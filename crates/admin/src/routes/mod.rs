//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Health check
//!
//! # App shell (embedded in the Shopify admin)
//! GET  /                           - Redirect to /app, keeping the query
//! GET  /app                        - App home with navigation
//!
//! # Description generator
//! GET  /ai                         - Generator form
//! POST /ai                         - Generate and render the result
//! POST /api/generate-description   - JSON relay to the completion API
//!
//! # Products (read from Shopify)
//! GET  /products?q=                - First page of products, optionally filtered
//! ```

pub mod ai;
pub mod api;
pub mod app;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Build the complete application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .merge(app::router())
        .merge(ai::router())
        .merge(products::router())
        .merge(api::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check upstream APIs.
async fn health() -> &'static str {
    "ok"
}
