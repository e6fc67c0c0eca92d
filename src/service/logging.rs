//! Logging wrapper for services

use super::Service;
use crate::domain::{CatalogEntry, Item};
use crate::ScrapeError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Logs every call of the wrapped service, tagged with a source name
pub struct LoggingService<S> {
    name: String,
    inner: S,
}

impl<S> LoggingService<S> {
    pub fn new(name: impl Into<String>, inner: S) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<S: Service> Service for LoggingService<S> {
    async fn get_item(&self, cancel: &CancellationToken, id: &str) -> Result<Item, ScrapeError> {
        tracing::info!(source = %self.name, id, "Getting item");

        let result = self.inner.get_item(cancel, id).await;
        match &result {
            Ok(item) => tracing::info!(source = %self.name, id, title = %item.title, "Got item"),
            Err(e) => tracing::error!(source = %self.name, id, "Failed to get item: {}", e),
        }
        result
    }

    async fn get_items(&self, cancel: &CancellationToken) -> Result<Vec<Item>, ScrapeError> {
        tracing::info!(source = %self.name, "Getting items");

        let result = self.inner.get_items(cancel).await;
        match &result {
            Ok(items) => tracing::info!(source = %self.name, count = items.len(), "Got items"),
            Err(e) => tracing::error!(source = %self.name, "Failed to get items: {}", e),
        }
        result
    }

    async fn list_catalog(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogEntry>, ScrapeError> {
        tracing::info!(source = %self.name, "Listing catalog");

        let result = self.inner.list_catalog(cancel).await;
        match &result {
            Ok(entries) => {
                tracing::info!(source = %self.name, count = entries.len(), "Listed catalog")
            }
            Err(e) => tracing::error!(source = %self.name, "Failed to list catalog: {}", e),
        }
        result
    }
}
