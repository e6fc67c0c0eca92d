//! Songbook scraper main entry point
//!
//! This is the command-line interface for the songbook scraper.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use songbook_scraper::config::{load_config, Config};
use songbook_scraper::output::{write_output, Destination};
use songbook_scraper::{build_service, Service};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Songbook scraper: collects song texts from configured sites
///
/// Fetches the catalog of every configured source, rebuilds each song from
/// its printable page and writes the merged, title-sorted result as JSON.
#[derive(Parser, Debug)]
#[command(name = "songbook-scraper")]
#[command(version)]
#[command(about = "Scrapes song texts into JSON", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Where to write JSON: a file path, or `-` for stdout
    /// [default: output.file-path for `items`, stdout otherwise]
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Scrape every item of the catalog (default)
    Items,

    /// Scrape a single item by id
    Item {
        /// Item id as it appears in the catalog
        id: String,
    },

    /// List the catalog without fetching items
    Catalog,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::info!("No configuration given, using built-in defaults");
            Config::default()
        }
    };

    let service = build_service(&config).context("failed to build scraping service")?;
    tracing::info!("Configured sources: {}", service.len());

    let cancel = CancellationToken::new();
    spawn_shutdown_listener(cancel.clone());

    let command = cli.command.clone().unwrap_or(Command::Items);
    let destination = destination_for(&cli, &command, &config);

    match command {
        Command::Items => {
            let items = service
                .get_items(&cancel)
                .await
                .context("failed to scrape items")?;
            tracing::info!("Scraped {} items", items.len());
            write_output(&destination, &items)?;
        }
        Command::Item { id } => {
            let item = service
                .get_item(&cancel, &id)
                .await
                .with_context(|| format!("failed to scrape item {}", id))?;
            write_output(&destination, &item)?;
        }
        Command::Catalog => {
            let entries = service
                .list_catalog(&cancel)
                .await
                .context("failed to list catalog")?;
            tracing::info!("Listed {} catalog entries", entries.len());
            write_output(&destination, &entries)?;
        }
    }

    tracing::info!("Results written to: {}", destination);
    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so that JSON on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("songbook_scraper=info,warn"),
            1 => EnvFilter::new("songbook_scraper=debug,info"),
            2 => EnvFilter::new("songbook_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels the token on Ctrl-C so in-flight fetches and backoffs stop
fn spawn_shutdown_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl-C, cancelling");
            cancel.cancel();
        }
    });
}

fn destination_for(cli: &Cli, command: &Command, config: &Config) -> Destination {
    match (&cli.output, command) {
        (Some(output), _) => Destination::parse(output),
        (None, Command::Items) => Destination::parse(&config.output.file_path),
        (None, _) => Destination::Stdout,
    }
}
