//! Markup extraction
//!
//! This module turns raw HTML into domain values:
//! - Catalog listings into `CatalogEntry` lists
//! - Song pages into `Item`s (title, tags, groups of lines)
//!
//! Extraction is tolerant: links that do not look like item links and
//! missing optional metadata are skipped rather than reported.

mod grob;
mod tables;
mod text;

pub use grob::{GrobExtractor, GROB_PARSER_ID};
pub use tables::{artist_for_album, canonical_album};
pub use text::{catalog_id, normalize_text};

use crate::domain::{CatalogEntry, Item};
use crate::{ConfigError, ParseError};
use std::sync::Arc;

/// Capability to parse one source's markup into domain values
pub trait Extractor: Send + Sync {
    /// Extracts the catalog entries listed in `markup`, in document order.
    fn parse_catalog(&self, markup: &str) -> Result<Vec<CatalogEntry>, ParseError>;

    /// Extracts a single item; the returned `id` is left empty for the caller to fill.
    fn parse_item(&self, markup: &str) -> Result<Item, ParseError>;
}

/// Returns the extractor registered under `name`
pub fn extractor_by_name(name: &str) -> Result<Arc<dyn Extractor>, ConfigError> {
    match name {
        GROB_PARSER_ID => Ok(Arc::new(GrobExtractor::new()?)),
        other => Err(ConfigError::UnknownParser(other.to_string())),
    }
}
