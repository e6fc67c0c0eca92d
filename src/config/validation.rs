use crate::config::types::{Config, OutputConfig, RetryConfig, SourceConfig};
use crate::extractor::extractor_by_name;
use crate::fetcher::resolve_encoding;
use crate::service::ID_PLACEHOLDER;
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_output_config(&config.output)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.file_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output file_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates every source and checks that names are unique
fn validate_sources(sources: &[SourceConfig]) -> Result<(), ConfigError> {
    if sources.is_empty() {
        return Err(ConfigError::Validation(
            "at least one source must be configured".to_string(),
        ));
    }

    let mut names = HashSet::new();
    for source in sources {
        validate_source(source)?;

        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "source name '{}' is used more than once",
                source.name
            )));
        }
    }

    Ok(())
}

/// Validates a single source
fn validate_source(config: &SourceConfig) -> Result<(), ConfigError> {
    if config.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "source name cannot be empty".to_string(),
        ));
    }

    extractor_by_name(&config.parser)?;

    let url = Url::parse(&config.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid base_url '{}' for source '{}': {}",
            config.base_url, config.name, e
        ))
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url '{}' for source '{}' must use HTTP or HTTPS",
            config.base_url, config.name
        )));
    }

    if let Some(label) = &config.encoding {
        resolve_encoding(label)?;
    }

    if config.catalog_path.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "catalog_path for source '{}' cannot be empty",
            config.name
        )));
    }

    let placeholders = config.item_path.matches(ID_PLACEHOLDER).count();
    if placeholders != 1 {
        return Err(ConfigError::Validation(format!(
            "item_path for source '{}' must contain exactly one {} placeholder, got {}",
            config.name, ID_PLACEHOLDER, placeholders
        )));
    }

    if config.retry.enabled {
        validate_retry_config(&config.retry)?;
    }

    Ok(())
}

/// Validates retry bounds
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "retry attempts must be >= 1, got {}",
            config.attempts
        )));
    }

    if config.min_interval_ms == 0 || config.max_interval_ms == 0 {
        return Err(ConfigError::Validation(
            "retry intervals must be positive".to_string(),
        ));
    }

    if config.min_interval_ms > config.max_interval_ms {
        return Err(ConfigError::Validation(format!(
            "retry min_interval_ms ({}) must be <= max_interval_ms ({})",
            config.min_interval_ms, config.max_interval_ms
        )));
    }

    if !config.factor.is_finite() || config.factor <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "retry factor must be positive, got {}",
            config.factor
        )));
    }

    Ok(())
}
