//! Response headers for pages framed inside the Shopify admin.
//!
//! An embedded app is loaded in an iframe on `admin.shopify.com` (or the
//! shop's own domain). Browsers only allow that when the page's CSP lists
//! those origins in `frame-ancestors`.

use axum::{
    extract::{Request, State},
    http::{
        HeaderValue,
        header::{CONTENT_SECURITY_POLICY, X_CONTENT_TYPE_OPTIONS},
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

const SHOPIFY_ADMIN_ORIGIN: &str = "https://admin.shopify.com";

/// Add embedding headers to all responses.
///
/// Headers applied:
/// - `Content-Security-Policy: frame-ancestors <shop origins> https://admin.shopify.com;`
/// - `X-Content-Type-Options: nosniff`
pub async fn embedded_document_headers(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let policy = frame_ancestors_policy(&state.config().shop_domains());
    match HeaderValue::from_str(&policy) {
        Ok(value) => {
            headers.insert(CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::warn!("Invalid frame-ancestors policy {policy:?}: {e}"),
    }

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    response
}

/// Build the CSP `frame-ancestors` directive for the given shop domains.
fn frame_ancestors_policy(shop_domains: &[&str]) -> String {
    let origins = shop_domains
        .iter()
        .map(|domain| format!("https://{domain}"))
        .chain(std::iter::once(SHOPIFY_ADMIN_ORIGIN.to_string()))
        .collect::<Vec<_>>()
        .join(" ");
    format!("frame-ancestors {origins};")
}
