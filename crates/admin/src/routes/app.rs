//! App shell route handlers.
//!
//! `/app` is where Shopify lands the merchant when the app is opened from
//! the admin. It renders the navigation shared by every page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{OriginalUri, State},
    response::Redirect,
    routing::get,
};
use tracing::instrument;

use crate::{middleware::ShopifyAdmin, state::AppState};

/// Navigation context rendered by `base.html`.
#[derive(Debug, Clone)]
pub struct ShellView {
    /// App client ID for App Bridge.
    pub api_key: String,
    /// Path of the current page, for highlighting the nav entry.
    pub current_path: String,
}

impl ShellView {
    #[must_use]
    pub fn new(state: &AppState, current_path: &str) -> Self {
        Self {
            api_key: state.config().app.api_key.clone(),
            current_path: current_path.to_string(),
        }
    }
}

/// App home template.
#[derive(Template, WebTemplate)]
#[template(path = "app/index.html")]
pub struct AppHomeTemplate {
    pub shell: ShellView,
    pub shop: String,
    pub scopes: Vec<String>,
}

/// Build the app shell router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/app", get(home))
}

/// GET / - send the merchant to `/app`, keeping launch parameters.
async fn root(OriginalUri(uri): OriginalUri) -> Redirect {
    Redirect::to(&app_location(uri.query()))
}

/// GET /app - app home with navigation.
#[instrument(skip_all)]
async fn home(ShopifyAdmin(_admin): ShopifyAdmin, State(state): State<AppState>) -> AppHomeTemplate {
    AppHomeTemplate {
        shell: ShellView::new(&state, "/app"),
        shop: state.config().shopify.store_domain.clone(),
        scopes: state.config().app.scopes.clone(),
    }
}

fn app_location(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("/app?{q}"),
        _ => "/app".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_location_keeps_query() {
        assert_eq!(
            app_location(Some("shop=test.myshopify.com&host=abc")),
            "/app?shop=test.myshopify.com&host=abc"
        );
    }

    #[test]
    fn test_app_location_without_query() {
        assert_eq!(app_location(None), "/app");
        assert_eq!(app_location(Some("")), "/app");
    }
}
