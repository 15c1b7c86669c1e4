//! Products list route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use shop_copilot_core::ProductSummary;
use tracing::instrument;

use crate::{
    error::AppError,
    middleware::ShopifyAdmin,
    shopify::PRODUCT_PAGE_SIZE,
    state::AppState,
};

use super::app::ShellView;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Product view for templates.
#[derive(Debug, Clone)]
pub struct ProductView {
    pub title: String,
    pub vendor: String,
    pub handle: String,
    pub tags: Vec<String>,
    pub admin_url: Option<String>,
}

impl ProductView {
    fn new(product: ProductSummary, store: &str) -> Self {
        let admin_url = product
            .id
            .numeric_id()
            .map(|id| format!("{}/products/{id}", admin_store_url(store)));

        Self {
            title: product.title,
            vendor: product.vendor,
            handle: product.handle,
            tags: product.tags,
            admin_url,
        }
    }
}

/// Products list page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub shell: ShellView,
    pub products: Vec<ProductView>,
    pub search_query: String,
    pub create_product_url: String,
}

/// Build the products router.
pub fn router() -> Router<AppState> {
    Router::new().route("/products", get(index))
}

/// GET /products - first page of products, optionally filtered by `q`.
///
/// # Errors
///
/// Returns `AppError::Shopify` if the Admin API call fails.
#[instrument(skip(admin, state))]
async fn index(
    ShopifyAdmin(admin): ShopifyAdmin,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ProductsIndexTemplate, AppError> {
    let products = admin
        .get_products(PRODUCT_PAGE_SIZE, query.q.clone())
        .await?;

    let store = &state.config().shopify.store_domain;
    Ok(ProductsIndexTemplate {
        shell: ShellView::new(&state, "/products"),
        products: products
            .into_iter()
            .map(|p| ProductView::new(p, store))
            .collect(),
        search_query: query.q.unwrap_or_default(),
        create_product_url: format!("{}/products/new", admin_store_url(store)),
    })
}

/// Shopify admin base URL for a store, e.g.
/// `https://admin.shopify.com/store/my-shop` for `my-shop.myshopify.com`.
fn admin_store_url(store_domain: &str) -> String {
    let handle = store_domain
        .strip_suffix(".myshopify.com")
        .unwrap_or(store_domain);
    format!("https://admin.shopify.com/store/{handle}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_copilot_core::ProductId;

    #[test]
    fn test_admin_store_url() {
        assert_eq!(
            admin_store_url("hydra-goods.myshopify.com"),
            "https://admin.shopify.com/store/hydra-goods"
        );
        assert_eq!(
            admin_store_url("hydra-goods"),
            "https://admin.shopify.com/store/hydra-goods"
        );
    }

    #[test]
    fn test_product_view_links_to_admin() {
        let product = ProductSummary {
            id: ProductId::new("gid://shopify/Product/108828309"),
            title: "Soy Candle".to_string(),
            vendor: "Hydra Goods".to_string(),
            handle: "soy-candle".to_string(),
            tags: vec!["candle".to_string()],
        };

        let view = ProductView::new(product, "hydra-goods.myshopify.com");
        assert_eq!(view.title, "Soy Candle");
        assert_eq!(view.vendor, "Hydra Goods");
        assert_eq!(
            view.admin_url.as_deref(),
            Some("https://admin.shopify.com/store/hydra-goods/products/108828309")
        );
    }

    #[test]
    fn test_product_view_without_numeric_id() {
        let product = ProductSummary {
            id: ProductId::new("not-a-gid"),
            title: "Mystery".to_string(),
            vendor: String::new(),
            handle: "mystery".to_string(),
            tags: vec![],
        };

        let view = ProductView::new(product, "hydra-goods.myshopify.com");
        assert!(view.admin_url.is_none());
    }
}
