//! Multi-source aggregation
//!
//! Single-item lookups try every source in order until one answers. Bulk
//! reads are all-or-nothing: one failing source fails the whole call so a
//! broken source is never silently thinned out of the result.

use super::Service;
use crate::domain::{sort_by_title, CatalogEntry, Item, Titled};
use crate::{AggregationError, ScrapeError};
use async_trait::async_trait;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Service merging the results of several sources
#[derive(Clone, Default)]
pub struct Aggregator {
    sources: Vec<Arc<dyn Service>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn Service>>) -> Self {
        Self { sources }
    }

    /// Number of aggregated sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Concatenates per-source results in source order, or fails with every
/// per-source error if any source failed.
async fn merge_all<T, F>(
    futures: impl IntoIterator<Item = F>,
    message: &str,
) -> Result<Vec<T>, ScrapeError>
where
    T: Titled,
    F: Future<Output = Result<Vec<T>, ScrapeError>>,
{
    let mut merged = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in join_all(futures).await.into_iter().enumerate() {
        match result {
            Ok(values) => merged.extend(values),
            Err(err) => errors.push(ScrapeError::source_failed(index, err)),
        }
    }

    if !errors.is_empty() {
        return Err(AggregationError::new(message, errors).into());
    }

    sort_by_title(&mut merged);
    Ok(merged)
}

#[async_trait]
impl Service for Aggregator {
    async fn get_item(&self, cancel: &CancellationToken, id: &str) -> Result<Item, ScrapeError> {
        let mut errors = Vec::new();
        for (index, source) in self.sources.iter().enumerate() {
            match source.get_item(cancel, id).await {
                Ok(item) => return Ok(item),
                Err(err) => errors.push(ScrapeError::source_failed(index, err)),
            }
        }

        Err(AggregationError::new(
            format!("failed to get the item with id={} from any source", id),
            errors,
        )
        .into())
    }

    async fn get_items(&self, cancel: &CancellationToken) -> Result<Vec<Item>, ScrapeError> {
        merge_all(
            self.sources.iter().map(|source| source.get_items(cancel)),
            "failed to aggregate items",
        )
        .await
    }

    async fn list_catalog(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogEntry>, ScrapeError> {
        merge_all(
            self.sources.iter().map(|source| source.list_catalog(cancel)),
            "failed to aggregate catalog entries",
        )
        .await
    }
}
