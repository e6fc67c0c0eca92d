//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; `Config::default()` describes the gr-oborona.ru source.
//!
//! # Example
//!
//! ```no_run
//! use songbook_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Writing songs to: {}", config.output.file_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RetryConfig, SourceConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
