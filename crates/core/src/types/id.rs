//! Shopify global IDs.
//!
//! The Admin API identifies every resource with a global ID of the form
//! `gid://shopify/<Type>/<numeric id>`. Values are kept verbatim; the
//! accessors only look inside them.

use core::fmt;

use serde::{Deserialize, Serialize};

const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// A product's Shopify global ID.
///
/// Wraps the string exactly as the Admin API returned it.
///
/// ```
/// use shop_copilot_core::ProductId;
///
/// let id = ProductId::new("gid://shopify/Product/632910392");
/// assert_eq!(id.numeric_id(), Some("632910392"));
/// assert_eq!(id.as_str(), "gid://shopify/Product/632910392");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a product ID from a global ID string.
    #[must_use]
    pub fn new(gid: impl Into<String>) -> Self {
        Self(gid.into())
    }

    /// Returns the global ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the trailing numeric segment, as used in admin URLs.
    ///
    /// Returns `None` if the ID is not a product GID or the segment is not
    /// purely numeric.
    #[must_use]
    pub fn numeric_id(&self) -> Option<&str> {
        let tail = self.0.strip_prefix(PRODUCT_GID_PREFIX)?;
        (!tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit())).then_some(tail)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ProductId {
    fn from(gid: String) -> Self {
        Self(gid)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}
