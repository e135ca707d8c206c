//! paste-crawler: an unattended crawler for paste-sharing sites
//!
//! This crate discovers newly published pastes from a listing page, fetches
//! and normalizes each one that has not been ingested before, stores the
//! structured record in SQLite and writes the raw content to disk.

pub mod config;
pub mod crawler;
pub mod paste;
pub mod storage;

use thiserror::Error;

/// Main error type for paste-crawler operations
#[derive(Debug, Error)]
pub enum PasteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Discovery failed for {url}: {message}")]
    Discovery { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Date error: {0}")]
    Date(#[from] paste::DateParseError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Worker error: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for paste-crawler operations
pub type Result<T> = std::result::Result<T, PasteError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlCycle, ItemProcessor, Scheduler};
pub use paste::{normalize_author, normalize_date, normalize_title, CandidateLink, Paste};
pub use storage::{SqliteStorage, Storage};
