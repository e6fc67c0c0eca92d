//! Content fetching
//!
//! This module retrieves raw content for a relative resource path:
//! - Resolving the path against a fixed base URL
//! - Issuing GET requests through a shared HTTP client
//! - Decoding the body from the source's character encoding
//! - Retrying failed requests with exponential backoff

mod http;
mod retry;

pub use http::{build_http_client, resolve_encoding, HttpFetcher, DEFAULT_USER_AGENT};
pub use retry::RetryPolicy;

use crate::FetchError;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Capability to retrieve the text content behind a relative path
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the content at `path`, relative to the fetcher's base location.
    ///
    /// Cancelling `cancel` aborts the request and any pending retry delay.
    async fn fetch(&self, cancel: &CancellationToken, path: &str) -> Result<String, FetchError>;
}
