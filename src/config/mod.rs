//! Configuration module for paste-crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! The configuration is read once at startup and handed to the components that
//! need it; nothing looks it up globally.
//!
//! # Example
//!
//! ```no_run
//! use paste_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling {} every {}s", config.crawler.url, config.crawler.interval);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, DatabaseConfig, UserAgentConfig, DEFAULT_INTERVAL_SECS};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
