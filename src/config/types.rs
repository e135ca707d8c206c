use serde::Deserialize;
use std::time::Duration;

/// Seconds between crawl cycles when `crawler.interval` is absent
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Upper bound on the default worker pool size
const MAX_DEFAULT_WORKERS: usize = 32;

/// Main configuration structure for paste-crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub database: DatabaseConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Base URL of the site; the listing page lives here
    pub url: String,

    /// Seconds to wait between the end of one cycle and the start of the next
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Directory that receives one `<id>.txt` file per paste
    #[serde(rename = "pastes-path")]
    pub pastes_path: String,

    /// Number of pastes fetched concurrently within a cycle
    #[serde(rename = "max-workers", default)]
    pub max_workers: Option<usize>,
}

impl CrawlerConfig {
    /// Interval between cycles as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    /// Worker pool size: the configured value, or CPU count + 4 capped at 32
    pub fn worker_count(&self) -> usize {
        self.max_workers.unwrap_or_else(|| {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            (cpus + 4).min(MAX_DEFAULT_WORKERS)
        })
    }
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(url) => format!("{}/{} (+{})", self.crawler_name, self.crawler_version, url),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}
