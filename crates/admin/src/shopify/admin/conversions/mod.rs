//! Type conversions from GraphQL response types to domain types.
//!
//! These functions convert the generated `graphql_client` types
//! into the shared types from `shop-copilot-core`.

mod products;

pub use products::convert_product_edges;
