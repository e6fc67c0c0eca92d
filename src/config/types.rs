use crate::fetcher::DEFAULT_USER_AGENT;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default = "default_sources")]
    pub sources: Vec<SourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            sources: default_sources(),
        }
    }
}

fn default_sources() -> Vec<SourceConfig> {
    vec![SourceConfig::default()]
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON file written by a full scrape
    #[serde(rename = "file-path")]
    pub file_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_path: "./out/songs.json".to_string(),
        }
    }
}

/// One external content source
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Name used in logs
    pub name: String,

    /// Id of the extractor understanding this source's markup
    pub parser: String,

    /// Base URL every resource path is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// WHATWG label of the source's character encoding (e.g. "windows-1251")
    ///
    /// Omitting the key means the body must already be UTF-8.
    #[serde(default)]
    pub encoding: Option<String>,

    /// Path of the catalog listing
    #[serde(rename = "catalog-path")]
    pub catalog_path: String,

    /// Path template of a single item, with one `{id}` placeholder
    #[serde(rename = "item-path")]
    pub item_path: String,

    /// Whether scraped values are validated
    pub validation: bool,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: "grob".to_string(),
            parser: "grob".to_string(),
            base_url: "https://www.gr-oborona.ru".to_string(),
            encoding: Some("windows-1251".to_string()),
            catalog_path: "/texts".to_string(),
            item_path: "/text_print.php?area=go_texts&id={id}".to_string(),
            validation: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
        }
    }
}

/// Retry behavior of a source's fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub enabled: bool,

    /// Total number of attempts, including the first one
    pub attempts: u32,

    /// Delay before the first retry (milliseconds)
    #[serde(rename = "min-interval-ms")]
    pub min_interval_ms: u64,

    /// Upper bound of any retry delay (milliseconds)
    #[serde(rename = "max-interval-ms")]
    pub max_interval_ms: u64,

    /// Growth factor of the delay per attempt
    pub factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attempts: 5,
            min_interval_ms: 2000,
            max_interval_ms: 10000,
            factor: 1.5,
        }
    }
}
