//! Product type conversion functions.

use shop_copilot_core::{ProductId, ProductSummary};

use super::super::queries::get_products;

// =============================================================================
// GetProducts conversions
// =============================================================================

/// Flatten the connection's edges into summaries, keeping API order.
pub fn convert_product_edges(products: get_products::GetProductsProducts) -> Vec<ProductSummary> {
    products
        .edges
        .into_iter()
        .map(|edge| convert_product_node(edge.node))
        .collect()
}

fn convert_product_node(node: get_products::GetProductsProductsEdgesNode) -> ProductSummary {
    ProductSummary {
        id: ProductId::new(node.id),
        title: node.title,
        vendor: node.vendor,
        handle: node.handle,
        tags: node.tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_product_edges_preserves_order_and_fields() {
        let data: get_products::ResponseData = serde_json::from_value(serde_json::json!({
            "products": {
                "edges": [
                    { "node": {
                        "id": "gid://shopify/Product/2",
                        "title": "Soy Candle",
                        "vendor": "Wickery",
                        "handle": "soy-candle",
                        "tags": ["candle", "soy"]
                    }},
                    { "node": {
                        "id": "gid://shopify/Product/1",
                        "title": "Water Bottle",
                        "vendor": "Hydra",
                        "handle": "water-bottle",
                        "tags": []
                    }}
                ]
            }
        }))
        .expect("deserialize");

        let products = convert_product_edges(data.products);
        assert_eq!(products.len(), 2);

        let first = products.first().expect("first product");
        assert_eq!(first.id.as_str(), "gid://shopify/Product/2");
        assert_eq!(first.title, "Soy Candle");
        assert_eq!(first.vendor, "Wickery");
        assert_eq!(first.handle, "soy-candle");
        assert_eq!(first.tags, vec!["candle".to_string(), "soy".to_string()]);

        let second = products.get(1).expect("second product");
        assert_eq!(second.handle, "water-bottle");
        assert!(second.tags.is_empty());
    }

    #[test]
    fn test_missing_edges_does_not_deserialize() {
        let result: Result<get_products::ResponseData, _> =
            serde_json::from_value(serde_json::json!({ "products": {} }));
        assert!(result.is_err());
    }
}
