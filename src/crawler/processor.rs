//! Per-paste processing
//!
//! Turns one candidate link into a finished `Paste`:
//! 1. Dedup gate: skip ids the store already holds, before any fetch
//! 2. Fetch the paste page and extract title, author and date
//! 3. Normalize every field
//! 4. Fetch the raw content as plain text
//!
//! Failed fetches degrade to empty input rather than dropping the paste, so
//! a paste whose page could not be fetched is still recorded, with sentinel
//! fields.

use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{parse_paste_page, PastePage};
use crate::paste::{normalize_author, normalize_date, normalize_title, CandidateLink, Paste};
use crate::storage::Storage;
use crate::PasteError;
use chrono::{DateTime, SubsecRound, Utc};
use std::sync::Arc;
use url::Url;

/// Outcome of processing one candidate link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// A new, fully populated paste
    Accepted(Paste),

    /// The paste is already stored
    Skipped,
}

/// Fetches, extracts and normalizes individual pastes
pub struct ItemProcessor {
    /// Base URL with a trailing slash, so joins keep any path prefix
    site_root: Url,
    fetcher: Arc<dyn PageFetcher>,
    storage: Arc<dyn Storage>,
}

impl ItemProcessor {
    /// Creates a processor resolving paste links against `base_url`
    pub fn new(base_url: Url, fetcher: Arc<dyn PageFetcher>, storage: Arc<dyn Storage>) -> Self {
        Self {
            site_root: site_root(base_url),
            fetcher,
            storage,
        }
    }

    /// Processes one candidate link
    ///
    /// # Returns
    ///
    /// * `Ok(ProcessOutcome::Skipped)` - The id is already stored; nothing was fetched
    /// * `Ok(ProcessOutcome::Accepted(paste))` - A new paste, possibly with sentinel fields
    /// * `Err(PasteError)` - The store could not be queried or the link could not be resolved
    pub async fn process(&self, link: &CandidateLink) -> Result<ProcessOutcome, PasteError> {
        if self.storage.exists_by_id(&link.id)? {
            tracing::info!("Paste '{}' already exists, skipping", link.id);
            return Ok(ProcessOutcome::Skipped);
        }

        tracing::info!("Scraping paste '{}'", link.id);
        let processed_at = Utc::now().trunc_subsecs(0);

        let page_url = self.site_root.join(link.href.trim_start_matches('/'))?;
        let page = match self.fetcher.fetch(page_url.as_str()).await.into_result() {
            Ok(body) => parse_paste_page(&body),
            Err(reason) => {
                tracing::warn!("Failed to fetch {} ({}), no content found", page_url, reason);
                PastePage::default()
            }
        };

        let raw_url = self.site_root.join(&format!("raw/{}", link.id))?;
        let content = match self.fetcher.fetch(raw_url.as_str()).await.into_result() {
            Ok(body) => body.trim().to_string(),
            Err(reason) => {
                tracing::warn!("Failed to fetch {} ({}), storing empty content", raw_url, reason);
                String::new()
            }
        };

        Ok(ProcessOutcome::Accepted(Paste {
            id: link.id.clone(),
            title: normalize_title(page.title.as_deref().unwrap_or_default()),
            author: normalize_author(page.author.as_deref().unwrap_or_default()),
            date: resolve_date(&link.id, page.date.as_deref(), processed_at),
            content,
        }))
    }
}

/// `base` with its path ending in `/`; `https://host/mirror` and
/// `https://host/mirror/` both resolve `raw/abc` under `/mirror/`
fn site_root(mut base: Url) -> Url {
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

/// Normalized page date, or `fallback` when the page has none or it does not parse
fn resolve_date(id: &str, raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    match raw.map(normalize_date) {
        Some(Ok(date)) => date,
        Some(Err(e)) => {
            tracing::warn!("Paste '{}': {}, using crawl time", id, e);
            fallback
        }
        None => {
            tracing::warn!("Paste '{}' has no date, using crawl time", id);
            fallback
        }
    }
}
