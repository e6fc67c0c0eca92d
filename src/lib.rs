//! Songbook scraper: a tolerant catalog scraper
//!
//! This crate retrieves a catalog of songs from one or more external sites,
//! rebuilds each song from its printable HTML page, validates the result and
//! merges everything into a single, deterministically ordered collection.

pub mod config;
pub mod domain;
pub mod extractor;
pub mod fetcher;
pub mod output;
pub mod service;

use std::fmt;
use thiserror::Error;

/// Main error type for scraping operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to fetch data: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to parse markup: {0}")]
    Parse(#[from] ParseError),

    #[error("failed to validate {target}: {source}")]
    Validation {
        target: String,
        source: ValidationError,
    },

    #[error("failed to get item with id={id}: {source}")]
    Item {
        id: String,
        source: Box<ScrapeError>,
    },

    #[error("fetch from source {index} failed: {source}")]
    Source {
        index: usize,
        source: Box<ScrapeError>,
    },

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("operation cancelled")]
    Cancelled,

    #[error("item fetches ended early: received {received} of {expected} results")]
    Incomplete { expected: usize, received: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Wraps an error with the id of the item whose fetch produced it.
    pub fn item(id: impl Into<String>, source: ScrapeError) -> Self {
        Self::Item {
            id: id.into(),
            source: Box::new(source),
        }
    }

    /// Wraps an error with the position of the source that produced it.
    pub fn source_failed(index: usize, source: ScrapeError) -> Self {
        Self::Source {
            index,
            source: Box::new(source),
        }
    }

    /// Returns true if the error was caused by cancellation anywhere down the chain.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled => true,
            Self::Fetch(err) => err.is_cancelled(),
            Self::Item { source, .. } | Self::Source { source, .. } => source.is_cancelled(),
            Self::Aggregation(err) => {
                !err.causes().is_empty() && err.causes().iter().all(ScrapeError::is_cancelled)
            }
            _ => false,
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unknown character encoding: {0}")]
    UnknownEncoding(String),

    #[error("Unknown parser: {0}")]
    UnknownParser(String),

    #[error("Failed to build extractor: {0}")]
    Extractor(#[from] ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised while retrieving raw content
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to resolve path '{path}': {source}")]
    InvalidUrl {
        path: String,
        source: ::url::ParseError,
    },

    #[error("failed to proceed request to {url}: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("server did not respond successfully for {url} - status code {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response from {url} as {encoding}")]
    Decode { url: String, encoding: String },

    #[error("failed to fetch after attempts={attempts}: {source}")]
    RetryExhausted {
        attempts: u32,
        source: Box<FetchError>,
    },

    #[error("fetch cancelled after attempts={attempts}")]
    Cancelled { attempts: u32 },
}

impl FetchError {
    /// Returns true if the fetch was aborted by the caller.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Cancelled { .. } => true,
            Self::RetryExhausted { source, .. } => source.is_cancelled(),
            _ => false,
        }
    }
}

/// Errors raised while turning markup into domain values
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: regex::Error,
    },
}

impl ParseError {
    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }
}

/// Violations found by validating an already constructed value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyValue { field: String },

    #[error("{field} must contain at least one element")]
    EmptyCollection { field: String },
}

impl ValidationError {
    pub fn empty_value(field: impl Into<String>) -> Self {
        Self::EmptyValue {
            field: field.into(),
        }
    }

    pub fn empty_collection(field: impl Into<String>) -> Self {
        Self::EmptyCollection {
            field: field.into(),
        }
    }
}

/// An error with a general message and every underlying cause, in order
#[derive(Debug)]
pub struct AggregationError {
    message: String,
    causes: Vec<ScrapeError>,
}

impl AggregationError {
    pub fn new(message: impl Into<String>, causes: Vec<ScrapeError>) -> Self {
        Self {
            message: message.into(),
            causes,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn causes(&self) -> &[ScrapeError] {
        &self.causes
    }
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.message)?;
        for (i, cause) in self.causes.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", cause)?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for AggregationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.causes
            .first()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use domain::{CatalogEntry, Group, Item, Tag};
pub use service::{build_service, Aggregator, Service, SourceScraper};
