//! Crawler module for discovering, fetching and ingesting pastes
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` capability
//! - HTML extraction for the listing page and paste pages
//! - Per-paste processing (dedup gate, extraction, normalization)
//! - The crawl cycle and its bounded worker pool
//! - Periodic scheduling of cycles

mod cycle;
mod fetcher;
mod parser;
mod processor;
mod scheduler;

pub use cycle::CrawlCycle;
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{extract_candidate_links, parse_paste_page, PastePage};
pub use processor::{ItemProcessor, ProcessOutcome};
pub use scheduler::Scheduler;

use crate::config::Config;
use crate::PasteError;
use std::future::Future;

/// Crawls according to `config` until `shutdown` completes
///
/// This is the main entry point for unattended operation. It will:
/// 1. Open the paste store and build the HTTP client
/// 2. Run a crawl cycle immediately
/// 3. Run another cycle every `interval` seconds after the previous one ends
///
/// # Returns
///
/// * `Ok(cycles)` - Number of cycles started before shutdown
/// * `Err(PasteError)` - Startup failed
pub async fn crawl<S>(config: &Config, shutdown: S) -> Result<u64, PasteError>
where
    S: Future<Output = ()>,
{
    let cycle = CrawlCycle::from_config(config)?;
    let scheduler = Scheduler::new(config.crawler.interval());

    tracing::info!(
        "Crawling {} every {:?} with {} workers",
        config.crawler.url,
        scheduler.interval(),
        cycle.pool_size()
    );

    let cycles = scheduler
        .run_until(
            move || {
                let cycle = cycle.clone();
                async move { cycle.run_once().await }
            },
            shutdown,
        )
        .await;

    Ok(cycles)
}
