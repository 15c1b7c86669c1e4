//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    completion::{CompletionClient, CompletionError},
    config::AppConfig,
    shopify::AdminClient,
};

/// Application state shared across all handlers.
///
/// Immutable after construction; cloning is an `Arc` bump.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    shopify_client: AdminClient,
    completion_client: CompletionClient,
}

impl AppState {
    /// Build state and clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion HTTP client cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, CompletionError> {
        let shopify_client = AdminClient::new(&config.shopify);
        let completion_client = CompletionClient::new(&config.openai)?;
        Ok(Self::from_parts(config, shopify_client, completion_client))
    }

    /// Assemble state from already-built clients.
    #[must_use]
    pub fn from_parts(
        config: AppConfig,
        shopify_client: AdminClient,
        completion_client: CompletionClient,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                shopify_client,
                completion_client,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn shopify(&self) -> &AdminClient {
        &self.inner.shopify_client
    }

    #[must_use]
    pub fn completion(&self) -> &CompletionClient {
        &self.inner.completion_client
    }
}
