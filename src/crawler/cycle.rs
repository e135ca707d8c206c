//! One crawl cycle: discover, fan out, collect, persist
//!
//! A cycle fetches the listing page, hands every candidate link to the
//! `ItemProcessor` on a bounded worker pool, writes each accepted paste's
//! content to the blob store and finally appends all accepted pastes to the
//! store in a single bulk insert.
//!
//! Failures are contained at two levels:
//! - Discovery and bulk-insert failures abort the cycle and are returned
//! - Anything that goes wrong with a single paste is logged and counted,
//!   and never affects the other pastes of the cycle

use crate::config::Config;
use crate::crawler::fetcher::{HttpFetcher, PageFetcher};
use crate::crawler::parser::extract_candidate_links;
use crate::crawler::processor::{ItemProcessor, ProcessOutcome};
use crate::paste::{CandidateLink, Paste};
use crate::storage::{open_storage, BlobStore, FsBlobStore, Storage};
use crate::PasteError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Drives a single discovery-fetch-persist pass
///
/// The worker pool is created once here and reused by every cycle. Cloning a
/// `CrawlCycle` is cheap and shares the pool, store and fetcher.
#[derive(Clone)]
pub struct CrawlCycle {
    listing_url: Url,
    processor: Arc<ItemProcessor>,
    fetcher: Arc<dyn PageFetcher>,
    storage: Arc<dyn Storage>,
    blobs: Arc<dyn BlobStore>,
    workers: Arc<Semaphore>,
    pool_size: usize,
}

impl CrawlCycle {
    /// Creates a cycle crawling the site at `base_url`
    ///
    /// # Arguments
    ///
    /// * `base_url` - Site root; also the listing page
    /// * `fetcher` - Network capability
    /// * `storage` - Paste store, shared with every worker
    /// * `blobs` - Destination for raw paste content
    /// * `pool_size` - Maximum number of pastes processed at once (at least 1)
    pub fn new(
        base_url: Url,
        fetcher: Arc<dyn PageFetcher>,
        storage: Arc<dyn Storage>,
        blobs: Arc<dyn BlobStore>,
        pool_size: usize,
    ) -> Self {
        let pool_size = pool_size.max(1);
        let processor = ItemProcessor::new(base_url.clone(), fetcher.clone(), storage.clone());

        Self {
            listing_url: base_url,
            processor: Arc::new(processor),
            fetcher,
            storage,
            blobs,
            workers: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        }
    }

    /// Builds a cycle from configuration: HTTP fetcher, SQLite store and
    /// filesystem blob store
    pub fn from_config(config: &Config) -> Result<Self, PasteError> {
        let base_url = Url::parse(&config.crawler.url)?;
        let fetcher = HttpFetcher::from_config(&config.user_agent).map_err(|source| {
            PasteError::Http {
                url: config.crawler.url.clone(),
                source,
            }
        })?;
        let storage = open_storage(Path::new(&config.database.path))?;
        let blobs = FsBlobStore::new(&config.crawler.pastes_path);

        Ok(Self::new(
            base_url,
            Arc::new(fetcher),
            Arc::new(storage),
            Arc::new(blobs),
            config.crawler.worker_count(),
        ))
    }

    /// Number of pastes processed concurrently
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Every stored paste
    pub fn get_all(&self) -> Result<Vec<Paste>, PasteError> {
        Ok(self.storage.get_all()?)
    }

    /// Fetches the listing page and extracts the candidate links
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CandidateLink>)` - Distinct candidates, possibly none
    /// * `Err(PasteError::Discovery)` - The listing page could not be fetched
    ///   or has no listing menu
    pub async fn discover(&self) -> Result<Vec<CandidateLink>, PasteError> {
        tracing::info!("Crawling {}...", self.listing_url);

        let body = self
            .fetcher
            .fetch(self.listing_url.as_str())
            .await
            .into_result()
            .map_err(|message| self.discovery_error(message))?;

        let links =
            extract_candidate_links(&body).map_err(|message| self.discovery_error(message))?;

        tracing::info!("Found {} pastes", links.len());
        tracing::debug!(
            "Candidate ids: {:?}",
            links.iter().map(|l| l.id.as_str()).collect::<Vec<_>>()
        );
        Ok(links)
    }

    /// Runs one full cycle
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Paste>)` - The pastes accepted and stored by this cycle
    /// * `Err(PasteError)` - Discovery or the bulk insert failed
    pub async fn run_once(&self) -> Result<Vec<Paste>, PasteError> {
        let links = self.discover().await?;
        let candidates = links.len();

        let mut tasks = JoinSet::new();
        for link in links {
            let processor = Arc::clone(&self.processor);
            let workers = Arc::clone(&self.workers);
            tasks.spawn(async move {
                let outcome = match workers.acquire_owned().await {
                    Ok(_permit) => processor.process(&link).await,
                    Err(_) => Err(PasteError::Worker("worker pool is closed".to_string())),
                };
                (link.id, outcome)
            });
        }

        let mut accepted = Vec::new();
        let mut skipped = 0usize;
        let mut failed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(ProcessOutcome::Accepted(paste)))) => accepted.push(paste),
                Ok((_, Ok(ProcessOutcome::Skipped))) => skipped += 1,
                Ok((id, Err(e))) => {
                    failed += 1;
                    tracing::error!("Failed to process paste '{}': {}", id, e);
                }
                Err(e) => {
                    failed += 1;
                    tracing::error!("Paste worker did not complete: {}", e);
                }
            }
        }

        tracing::info!(
            "Processed {} candidates: {} new, {} already stored, {} failed",
            candidates,
            accepted.len(),
            skipped,
            failed
        );

        for paste in &accepted {
            self.save_to_file(paste);
        }

        self.store_pastes(&accepted)?;

        Ok(accepted)
    }

    /// Writes the paste content to the blob store; failures are logged only,
    /// the content is also part of the stored record
    fn save_to_file(&self, paste: &Paste) {
        match self.blobs.write_blob(&paste.id, &paste.content) {
            Ok(path) => tracing::debug!("Saved paste '{}' to {}", paste.id, path.display()),
            Err(e) => tracing::error!("Failed to save content of paste '{}': {}", paste.id, e),
        }
    }

    fn store_pastes(&self, pastes: &[Paste]) -> Result<(), PasteError> {
        if pastes.is_empty() {
            tracing::info!("No pastes inserted into the database");
            return Ok(());
        }

        let inserted = self.storage.insert_many(pastes)?;
        tracing::info!("Inserted {} pastes into the database", inserted);
        Ok(())
    }

    fn discovery_error(&self, message: String) -> PasteError {
        PasteError::Discovery {
            url: self.listing_url.to_string(),
            message,
        }
    }
}
