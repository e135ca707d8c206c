//! Paste records and field normalization
//!
//! This module defines the record the crawler produces for every ingested
//! paste, the ephemeral candidate link found on the listing page, and the
//! pure functions that map scraped strings to canonical field values.

mod normalize;

pub use normalize::{
    normalize_author, normalize_date, normalize_title, DateParseError, DEFAULT_AUTHOR,
    DEFAULT_TITLE,
};

use chrono::{DateTime, Utc};

/// One crawled paste
///
/// A paste is only ever built fully populated, with sentinel values standing
/// in for fields the page did not provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paste {
    /// Identifier derived from the listing link; unique in the store
    pub id: String,
    pub title: String,
    pub author: String,
    /// Publication time, normalized to UTC
    pub date: DateTime<Utc>,
    /// Raw body text, trimmed
    pub content: String,
}

/// A link discovered on the listing page, not yet checked against the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateLink {
    pub href: String,
    pub id: String,
}

impl CandidateLink {
    /// Builds a candidate from an href; the id is the href with every path
    /// separator removed
    ///
    /// Returns `None` when the href does not name a paste (`/`, `.`, `..`).
    ///
    /// # Examples
    ///
    /// ```
    /// use paste_crawler::paste::CandidateLink;
    ///
    /// let link = CandidateLink::from_href("/AbC123").unwrap();
    /// assert_eq!(link.id, "AbC123");
    /// assert!(CandidateLink::from_href("/").is_none());
    /// ```
    pub fn from_href(href: &str) -> Option<Self> {
        let href = href.trim();
        let id: String = href.chars().filter(|c| *c != '/').collect();

        if id.is_empty() || id == "." || id == ".." {
            return None;
        }

        Some(Self {
            href: href.to_string(),
            id,
        })
    }
}
