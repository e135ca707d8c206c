//! paste-crawler main entry point
//!
//! This is the command-line interface for the paste-crawler daemon.

use anyhow::Context;
use clap::Parser;
use paste_crawler::config::{load_config_with_hash, Config};
use paste_crawler::crawler::{crawl, CrawlCycle};
use paste_crawler::storage::{open_storage, Storage};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// paste-crawler: an unattended paste-site crawler
///
/// paste-crawler polls a paste site's listing page, fetches every paste it
/// has not seen before, stores the normalized record in SQLite and writes
/// the raw content to disk.
#[derive(Parser, Debug)]
#[command(name = "paste-crawler")]
#[command(version)]
#[command(about = "An unattended paste-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Run a single crawl cycle and exit
    #[arg(long, conflicts_with = "list")]
    once: bool,

    /// Print the stored pastes and exit
    #[arg(long, conflicts_with = "once")]
    list: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.list {
        handle_list(&config)
    } else if cli.once {
        handle_once(&config).await
    } else {
        handle_crawl(&config).await
    }
}

/// Sets up the logging/tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the filter follows the verbosity flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if quiet => EnvFilter::new("error"),
        Err(_) => match verbose {
            0 => EnvFilter::new("paste_crawler=info,warn"),
            1 => EnvFilter::new("paste_crawler=debug,info"),
            2 => EnvFilter::new("paste_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --list mode: prints every stored paste
fn handle_list(config: &Config) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.database.path))
        .context("failed to open the paste store")?;

    let pastes = storage.get_all()?;
    println!("Database: {} ({} pastes)\n", config.database.path, pastes.len());

    for paste in &pastes {
        println!(
            "{}  {}  {:<20}  {}",
            paste.id,
            paste.date.to_rfc3339(),
            paste.author,
            paste.title
        );
    }

    Ok(())
}

/// Handles the --once mode: one cycle, errors are fatal
async fn handle_once(config: &Config) -> anyhow::Result<()> {
    let cycle = CrawlCycle::from_config(config).context("failed to initialize the crawler")?;

    let accepted = cycle.run_once().await.context("crawl cycle failed")?;
    tracing::info!("Crawl cycle completed, {} new pastes", accepted.len());

    Ok(())
}

/// Handles the main crawl operation: cycles until interrupted
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    let cycles = crawl(config, shutdown_signal())
        .await
        .context("failed to initialize the crawler")?;

    tracing::info!("Crawler stopped after {} cycles", cycles);
    Ok(())
}

/// Completes on Ctrl-C; if the signal cannot be installed, never completes
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
