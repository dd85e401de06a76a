//! bibsync binary
//!
//! Syncs a BibTeX file into a Notion database. Credentials are read from
//! `NOTION_TOKEN` and `DATABASE_IDENTIFIER`.

use std::path::PathBuf;

use bibsync_core::config::{DEFAULT_BIB_PATH, DEFAULT_SNAPSHOT_PATH};
use bibsync_core::{run_sync, NotionClient, SyncConfig};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "bibsync", version, about = "Sync a BibTeX bibliography into a Notion database")]
struct Cli {
    /// BibTeX file to read
    #[arg(long, default_value = DEFAULT_BIB_PATH)]
    bib: PathBuf,

    /// Snapshot of the last synced values
    #[arg(long, default_value = DEFAULT_SNAPSHOT_PATH)]
    snapshot: PathBuf,

    /// Override the Notion API root
    #[arg(long)]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = SyncConfig::from_env()?;
    config.bib_path = cli.bib;
    config.snapshot_path = cli.snapshot;
    config.notion.timeout_secs = cli.timeout;
    if let Some(api_base) = cli.api_base {
        config.notion.api_base = api_base;
    }

    let client = NotionClient::new(config.notion.clone())?;
    let report = run_sync(&config, &client)?;

    if !report.failed.is_empty() {
        warn!(
            "{} entries were not synced and will be retried next run: {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
