//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of a source, including:
//! - Building the shared HTTP client with a browser-like user agent
//! - Resolving relative paths (with or without query strings)
//! - Treating any non-success status as a hard failure
//! - Decoding legacy character encodings
//! - Retrying with exponential backoff while observing cancellation

use super::{Fetcher, RetryPolicy};
use crate::{ConfigError, FetchError};
use async_trait::async_trait;
use encoding_rs::Encoding;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use url::Url;

/// User agent sent when the configuration does not name one
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/51.0.2704.103 Safari/537.36";

/// Builds an HTTP client with proper configuration
///
/// No request timeout is set: a single logical fetch is bounded by the
/// caller's cancellation token and by the retry policy.
pub fn build_http_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Looks up a character encoding by its WHATWG label (e.g. `windows-1251`)
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, ConfigError> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))
}

/// Fetcher issuing GET requests against a fixed base URL
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
    encoding: Option<&'static Encoding>,
    retry: Option<RetryPolicy>,
}

impl HttpFetcher {
    /// Creates a fetcher without decoding or retries.
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            encoding: None,
            retry: None,
        }
    }

    /// Decodes every response body through `encoding`.
    pub fn with_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    /// Retries failed fetches according to `policy`.
    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Resolves a relative path against the base URL
    ///
    /// # Example
    ///
    /// ```
    /// use songbook_scraper::fetcher::{build_http_client, HttpFetcher};
    /// use url::Url;
    ///
    /// let client = build_http_client("test").unwrap();
    /// let fetcher = HttpFetcher::new(client, Url::parse("https://example.com").unwrap());
    /// let url = fetcher.resolve("/text_print.php?area=go_texts&id=42").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/text_print.php?area=go_texts&id=42");
    /// ```
    pub fn resolve(&self, path: &str) -> Result<Url, FetchError> {
        self.base_url.join(path).map_err(|source| FetchError::InvalidUrl {
            path: path.to_string(),
            source,
        })
    }

    async fn fetch_with_retry(
        &self,
        cancel: &CancellationToken,
        url: &Url,
        policy: &RetryPolicy,
    ) -> Result<String, FetchError> {
        let mut attempt: u32 = 1;
        loop {
            let error = match self.fetch_once(cancel, url, attempt).await {
                Ok(content) => return Ok(content),
                Err(error) => error,
            };

            if error.is_cancelled() {
                return Err(error);
            }

            if attempt >= policy.attempts() {
                return Err(FetchError::RetryExhausted {
                    attempts: attempt,
                    source: Box::new(error),
                });
            }

            let delay = policy.next_delay(attempt - 1);
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return Err(FetchError::Cancelled { attempts: attempt });
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    async fn fetch_once(
        &self,
        cancel: &CancellationToken,
        url: &Url,
        attempt: u32,
    ) -> Result<String, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled { attempts: attempt }),
            result = self.request(url) => result,
        }
    }

    async fn request(&self, url: &Url) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        self.decode(url, &bytes)
    }

    fn decode(&self, url: &Url, bytes: &[u8]) -> Result<String, FetchError> {
        match self.encoding {
            Some(encoding) => {
                let (text, _, had_errors) = encoding.decode(bytes);
                if had_errors {
                    return Err(FetchError::Decode {
                        url: url.to_string(),
                        encoding: encoding.name().to_string(),
                    });
                }
                Ok(text.into_owned())
            }
            None => String::from_utf8(bytes.to_vec()).map_err(|_| FetchError::Decode {
                url: url.to_string(),
                encoding: "UTF-8".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, cancel: &CancellationToken, path: &str) -> Result<String, FetchError> {
        let url = self.resolve(path)?;
        match &self.retry {
            Some(policy) => self.fetch_with_retry(cancel, &url, policy).await,
            None => self.fetch_once(cancel, &url, 1).await,
        }
    }
}
