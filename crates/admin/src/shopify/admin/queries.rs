//! GraphQL query definitions for Shopify Admin API.
//!
//! Uses `graphql_client` to generate type-safe Rust code from GraphQL queries.
//! The schema file is a hand-maintained subset of the Admin API schema.

use graphql_client::GraphQLQuery;

// =============================================================================
// Product queries
// =============================================================================

/// First page of products, optionally filtered by a search string.
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/admin/schema.graphql",
    query_path = "graphql/admin/queries/products.graphql",
    response_derives = "Debug, Clone",
    variables_derives = "Debug, Clone, PartialEq"
)]
pub struct GetProducts;
