//! Shop Copilot Admin library.
//!
//! An embedded Shopify admin app with two features:
//! - product search, relayed to the Shopify Admin GraphQL API
//! - product description generation, relayed to a chat completion API
//!
//! The crate is a library so the router can be driven from integration
//! tests; `main.rs` only loads configuration and serves it.
//!
//! # Security
//!
//! This crate holds HIGH PRIVILEGE credentials:
//! - Shopify Admin API access token
//! - Completion API key

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod completion;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod shopify;
pub mod state;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use state::AppState;

/// Install the process-wide rustls crypto provider.
///
/// Must run before the first TLS client is built. Later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

/// Build the application router with its middleware stack.
///
/// Sentry layers are added by the binary, outside this router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::embedded_document_headers,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri().path(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
