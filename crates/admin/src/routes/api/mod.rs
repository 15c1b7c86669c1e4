//! API route handlers for admin.
//!
//! JSON API endpoints for scripts and the embedded app.

pub mod generate_description;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new().merge(generate_description::router())
}
