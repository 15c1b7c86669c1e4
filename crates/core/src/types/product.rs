//! Product summary returned by the product search relay.

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// The projection of a product shown in the product list.
///
/// Fields are copied verbatim from the Admin API; nothing is derived or
/// cached locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Shopify global ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: String,
    /// URL handle.
    pub handle: String,
    /// Tags in the order the API returned them.
    pub tags: Vec<String>,
}
