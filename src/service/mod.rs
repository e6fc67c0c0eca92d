//! Scraping services
//!
//! This module contains the three-operation `Service` interface and its
//! implementations:
//! - `SourceScraper`: one fetcher + one extractor for a single site
//! - `Aggregator`: merges several services, all-or-nothing for bulk reads
//! - `LoggingService`: wraps any service with tracing output

mod aggregator;
mod logging;
mod source;

pub use aggregator::Aggregator;
pub use logging::LoggingService;
pub use source::{SourceOptions, SourceScraper, ID_PLACEHOLDER};

use crate::config::{Config, SourceConfig};
use crate::domain::{CatalogEntry, Item};
use crate::extractor::extractor_by_name;
use crate::fetcher::{build_http_client, resolve_encoding, HttpFetcher, RetryPolicy};
use crate::{ConfigError, ScrapeError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// The operations every scraping service exposes
///
/// Lists returned by `get_items` and `list_catalog` are sorted by title with
/// a stable sort.
#[async_trait]
pub trait Service: Send + Sync {
    /// Fetches one full item by id.
    async fn get_item(&self, cancel: &CancellationToken, id: &str) -> Result<Item, ScrapeError>;

    /// Fetches every item listed in the catalog.
    async fn get_items(&self, cancel: &CancellationToken) -> Result<Vec<Item>, ScrapeError>;

    /// Lists the catalog without fetching item content.
    async fn list_catalog(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<CatalogEntry>, ScrapeError>;
}

/// Builds a source scraper from its configuration
///
/// # Returns
///
/// * `Ok(SourceScraper)` - Scraper with its fetcher and extractor wired in
/// * `Err(ConfigError)` - Unknown encoding or parser, bad URL, bad retry bounds
pub fn build_source(config: &SourceConfig) -> Result<SourceScraper, ConfigError> {
    let base_url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

    let client = build_http_client(&config.user_agent)?;
    let mut fetcher = HttpFetcher::new(client, base_url);

    if let Some(label) = &config.encoding {
        fetcher = fetcher.with_encoding(resolve_encoding(label)?);
    }

    if config.retry.enabled {
        let policy = RetryPolicy::new(
            config.retry.attempts,
            Duration::from_millis(config.retry.min_interval_ms),
            Duration::from_millis(config.retry.max_interval_ms),
            config.retry.factor,
        )?;
        fetcher = fetcher.with_retry(policy);
    }

    let extractor = extractor_by_name(&config.parser)?;

    SourceScraper::new(
        Arc::new(fetcher),
        extractor,
        SourceOptions {
            catalog_path: config.catalog_path.clone(),
            item_path: config.item_path.clone(),
            validation: config.validation,
        },
    )
}

/// Builds the aggregated service for every configured source
///
/// Each source is wrapped in a `LoggingService` tagged with its name.
pub fn build_service(config: &Config) -> Result<Aggregator, ConfigError> {
    let sources = config
        .sources
        .iter()
        .map(|source| {
            let scraper = build_source(source)?;
            Ok(Arc::new(LoggingService::new(source.name.clone(), scraper)) as Arc<dyn Service>)
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    Ok(Aggregator::new(sources))
}
