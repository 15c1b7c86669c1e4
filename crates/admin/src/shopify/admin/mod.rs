//! Shopify Admin API GraphQL client.
//!
//! This module provides a type-safe client for the Shopify Admin API using
//! GraphQL, authenticated with the store's Admin API access token.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, de::DeserializeOwned};
use shop_copilot_core::ProductSummary;
use tracing::instrument;

use crate::config::ShopifyAdminConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
pub mod queries;

use conversions::convert_product_edges;
use queries::GetProducts;

/// Number of products requested per product list page.
pub const PRODUCT_PAGE_SIZE: i64 = 20;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; all clones share one connection pool.
///
/// # Security
///
/// This client carries the HIGH PRIVILEGE Admin API access token.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: SecretString,
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client for the configured store.
    #[must_use]
    pub fn new(config: &ShopifyAdminConfig) -> Self {
        Self::with_endpoint(config.graphql_endpoint(), config.access_token.clone())
    }

    /// Create a client against an explicit GraphQL endpoint.
    ///
    /// Used when the endpoint is not `https://<store>/admin/api/...`, such as
    /// a local stand-in during tests.
    #[must_use]
    pub fn with_endpoint(endpoint: impl Into<String>, access_token: SecretString) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client: reqwest::Client::new(),
                endpoint: endpoint.into(),
                access_token,
            }),
        }
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query.
    ///
    /// Any of: a non-success status, GraphQL `errors`, missing `data`, or a
    /// `data` object that does not match the query's shape fails the call.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Retry-After is small and positive
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("X-Shopify-Access-Token", self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        // Check for rate limiting
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<f64>().ok())
                .map_or(2, |secs| secs.ceil() as u64);
            return Err(AdminShopifyError::RateLimited(retry_after));
        }

        // Check for unauthorized
        if response.status() == reqwest::StatusCode::UNAUTHORIZED
            || response.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid access token or missing scope".to_string(),
            ));
        }

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AdminShopifyError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = serde_json::from_str(&text)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response.data.ok_or_else(|| {
            AdminShopifyError::GraphQL(vec![GraphQLError {
                message: "No data in response".to_string(),
                locations: vec![],
                path: vec![],
            }])
        })
    }

    // =========================================================================
    // Product methods
    // =========================================================================

    /// Get the first page of products, optionally filtered.
    ///
    /// # Arguments
    ///
    /// * `first` - Page size
    /// * `query` - Shopify search syntax filter, forwarded unchanged
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails, returns GraphQL errors, or
    /// the response lacks the `products.edges` field.
    #[instrument(skip(self))]
    pub async fn get_products(
        &self,
        first: i64,
        query: Option<String>,
    ) -> Result<Vec<ProductSummary>, AdminShopifyError> {
        let response = self
            .execute::<GetProducts>(products_variables(first, query))
            .await?;

        let products = convert_product_edges(response.products);
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }
}

/// Build `GetProducts` variables. An empty search string means no filter.
fn products_variables(first: i64, query: Option<String>) -> queries::get_products::Variables {
    queries::get_products::Variables {
        first,
        query: query.filter(|q| !q.is_empty()),
    }
}
