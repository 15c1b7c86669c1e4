//! Admin request authentication for the embedded app.
//!
//! Shopify opens an embedded app with launch parameters
//! (`shop`, `host`, `timestamp`, `hmac`, ...) signed with the app secret.
//! The [`ShopifyAdmin`] extractor checks those parameters when present and
//! hands the handler an authenticated Admin API client. Once any launch
//! parameter appears, the signature and a fresh timestamp are mandatory.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{extract::FromRequestParts, http::request::Parts};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use sha2::Sha256;
use thiserror::Error;

use crate::error::AppError;
use crate::shopify::AdminClient;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Extractor that authenticates the request and yields an Admin API client.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ShopifyAdmin(admin): ShopifyAdmin) -> Result<String, AppError> {
///     let products = admin.get_products(20, None).await?;
///     Ok(format!("{} products", products.len()))
/// }
/// ```
pub struct ShopifyAdmin(pub AdminClient);

impl FromRequestParts<AppState> for ShopifyAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let params = query_pairs(parts.uri.query());
        let config = state.config();

        if let Err(rejection) = check_launch(
            &params,
            &config.shop_domains(),
            config.app.api_secret.expose_secret(),
            unix_now(),
        ) {
            tracing::warn!(
                shop = param(&params, "shop"),
                reason = %rejection,
                "Rejected launch request"
            );
            return Err(AppError::Unauthorized(rejection.to_string()));
        }

        Ok(Self(state.shopify().clone()))
    }
}

/// Query parameters Shopify adds when it opens the app.
const LAUNCH_PARAMS: &[&str] = &["shop", "host", "timestamp", "hmac", "session", "id_token"];

/// Allowed clock skew between Shopify signing a launch and us receiving it.
const LAUNCH_TIMESTAMP_TOLERANCE_SECS: u64 = 90;

/// Why a launch request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
enum LaunchRejection {
    #[error("unknown shop")]
    UnknownShop,
    #[error("missing signature")]
    MissingSignature,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("stale launch timestamp")]
    StaleTimestamp,
}

/// Check Shopify launch parameters.
///
/// Requests without any launch parameter pass. Otherwise the `shop` (if
/// given) must be one of `shop_domains`, the `hmac` must be present and
/// verify, and the signed `timestamp` must be within
/// [`LAUNCH_TIMESTAMP_TOLERANCE_SECS`] of `now`.
fn check_launch(
    params: &[(String, String)],
    shop_domains: &[&str],
    secret: &str,
    now: u64,
) -> Result<(), LaunchRejection> {
    if !params
        .iter()
        .any(|(k, _)| LAUNCH_PARAMS.contains(&k.as_str()))
    {
        return Ok(());
    }

    if let Some(shop) = param(params, "shop")
        && !shop_domains.contains(&shop)
    {
        return Err(LaunchRejection::UnknownShop);
    }

    let Some(provided) = param(params, "hmac") else {
        return Err(LaunchRejection::MissingSignature);
    };
    if !verify_launch_hmac(params, provided, secret) {
        return Err(LaunchRejection::InvalidSignature);
    }

    let fresh = param(params, "timestamp")
        .and_then(|t| t.parse::<u64>().ok())
        .is_some_and(|t| now.abs_diff(t) <= LAUNCH_TIMESTAMP_TOLERANCE_SECS);
    if !fresh {
        return Err(LaunchRejection::StaleTimestamp);
    }

    Ok(())
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

/// Decode a raw query string into key/value pairs.
fn query_pairs(query: Option<&str>) -> Vec<(String, String)> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Verify the HMAC signature of Shopify launch parameters.
///
/// The signed message is every parameter except `hmac` and `signature`,
/// sorted by key, formatted `key=value` and joined with `&`.
fn verify_launch_hmac(params: &[(String, String)], provided_hmac: &str, secret: &str) -> bool {
    let Ok(expected) = hex::decode(provided_hmac) else {
        return false;
    };

    let mut pairs: Vec<&(String, String)> = params
        .iter()
        .filter(|(k, _)| k != "hmac" && k != "signature")
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let message = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(message.as_bytes());

    // Constant-time comparison
    mac.verify_slice(&expected).is_ok()
}
