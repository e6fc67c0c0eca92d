//! Per-source orchestration
//!
//! A `SourceScraper` pairs one fetcher with one extractor and turns a catalog
//! listing into fully realized, validated items. Bulk reads fan out one task
//! per catalog entry and fan back in through a single channel.

use super::Service;
use crate::domain::{sort_by_title, CatalogEntry, Item, Validate};
use crate::extractor::Extractor;
use crate::fetcher::Fetcher;
use crate::{AggregationError, ConfigError, ScrapeError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Placeholder substituted with the item id in the item path template
pub const ID_PLACEHOLDER: &str = "{id}";

/// Fixed settings of a source scraper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOptions {
    /// Path of the catalog listing, relative to the fetcher's base URL
    pub catalog_path: String,

    /// Item path template containing exactly one `{id}` placeholder
    pub item_path: String,

    /// Whether produced values are validated
    pub validation: bool,
}

impl SourceOptions {
    fn check(&self) -> Result<(), ConfigError> {
        if self.catalog_path.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog path cannot be empty".to_string(),
            ));
        }

        let placeholders = self.item_path.matches(ID_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(ConfigError::Validation(format!(
                "item path '{}' must contain exactly one {} placeholder, found {}",
                self.item_path, ID_PLACEHOLDER, placeholders
            )));
        }

        Ok(())
    }

    /// Renders the item path for `id`.
    pub fn item_path_for(&self, id: &str) -> String {
        self.item_path.replacen(ID_PLACEHOLDER, id, 1)
    }
}

/// Scraper for a single external source
#[derive(Clone)]
pub struct SourceScraper {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    options: Arc<SourceOptions>,
}

impl SourceScraper {
    /// Creates a scraper, rejecting options that could never produce a valid path.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        options: SourceOptions,
    ) -> Result<Self, ConfigError> {
        options.check()?;
        Ok(Self {
            fetcher,
            extractor,
            options: Arc::new(options),
        })
    }

    async fn fetch_item(&self, cancel: &CancellationToken, id: &str) -> Result<Item, ScrapeError> {
        let content = self
            .fetcher
            .fetch(cancel, &self.options.item_path_for(id))
            .await?;

        let mut item = self.extractor.parse_item(&content)?;
        item.id = id.to_string();

        if self.options.validation {
            item.validate().map_err(|source| ScrapeError::Validation {
                target: format!("item id={}", id),
                source,
            })?;
        }

        Ok(item)
    }

    /// Waits for one result per entry, returning as soon as any fetch fails.
    ///
    /// Results are placed back in catalog order before sorting so that items
    /// with equal titles keep their listing order.
    async fn collect_items(
        &self,
        cancel: &CancellationToken,
        entries: Vec<CatalogEntry>,
    ) -> Result<Vec<Item>, ScrapeError> {
        let expected = entries.len();
        let (tx, mut rx) = mpsc::channel(expected.max(1));

        for (index, entry) in entries.into_iter().enumerate() {
            let scraper = self.clone();
            let cancel = cancel.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let result = scraper
                    .fetch_item(&cancel, &entry.id)
                    .await
                    .map_err(|err| ScrapeError::item(entry.id, err));
                // The receiver is gone once another fetch has failed
                let _ = tx.send((index, result)).await;
            });
        }
        drop(tx);

        let mut slots: Vec<Option<Item>> = vec![None; expected];
        let mut received = 0;
        while received < expected {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ScrapeError::Cancelled),
                message = rx.recv() => match message {
                    Some((index, Ok(item))) => {
                        slots[index] = Some(item);
                        received += 1;
                    }
                    Some((_, Err(err))) => return Err(err),
                    None => return Err(ScrapeError::Incomplete { expected, received }),
                },
            }
        }

        let mut items: Vec<Item> = slots.into_iter().flatten().collect();
        sort_by_title(&mut items);
        Ok(items)
    }
}

#[async_trait]
impl Service for SourceScraper {
    async fn get_item(&self, cancel: &CancellationToken, id: &str) -> Result<Item, ScrapeError> {
        self.fetch_item(cancel, id).await
    }

    async fn get_items(&self, cancel: &CancellationToken) -> Result<Vec<Item>, ScrapeError> {
        let entries = self.list_catalog(cancel).await?;
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        self.collect_items(cancel, entries).await
    }

    async fn list_catalog(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogEntry>, ScrapeError> {
        let content = self
            .fetcher
            .fetch(cancel, &self.options.catalog_path)
            .await?;

        let mut entries = self.extractor.parse_catalog(&content)?;

        if self.options.validation {
            let errors: Vec<ScrapeError> = entries
                .iter()
                .filter_map(|entry| {
                    entry.validate().err().map(|source| ScrapeError::Validation {
                        target: format!("catalog entry id={}", entry.id),
                        source,
                    })
                })
                .collect();

            if !errors.is_empty() {
                return Err(AggregationError::new("failed to validate catalog entries", errors).into());
            }
        }

        sort_by_title(&mut entries);
        Ok(entries)
    }
}
