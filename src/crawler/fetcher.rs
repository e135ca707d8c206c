//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests for listing pages, paste pages and raw content
//! - Error classification
//!
//! Fetching never fails hard: non-success responses and transport errors are
//! reported as `FetchResult` variants and the caller decides what an absent
//! body means for it.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Response body
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Body of a successful fetch, or a short description of the failure
    pub fn into_result(self) -> Result<String, String> {
        match self {
            Self::Success { body } => Ok(body),
            Self::HttpError { status_code } => Err(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Err(error),
        }
    }
}

/// Capability to fetch a URL
///
/// The crawler only ever talks to the network through this trait, so tests
/// and alternative transports can stand in for `HttpFetcher`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url` and classifies the outcome
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// `PageFetcher` backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with a client configured from `config`
    pub fn from_config(config: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use paste_crawler::config::UserAgentConfig;
/// use paste_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | Success with body |
/// | any other status | HttpError |
/// | timeout, connect failure, body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    match response.text().await {
        Ok(body) => FetchResult::Success { body },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let mut config = UserAgentConfig::default();
        config.crawler_name = "TestCrawler".to_string();
        config.crawler_version = "1.0".to_string();
        assert_eq!(config.header_value(), "TestCrawler/1.0");

        config.contact_url = Some("https://example.com/about".to_string());
        assert_eq!(
            config.header_value(),
            "TestCrawler/1.0 (+https://example.com/about)"
        );
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/raw/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("  body  "))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&UserAgentConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/raw/abc", server.uri())).await;

        match result {
            FetchResult::Success { body } => assert_eq!(body, "  body  "),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::from_config(&UserAgentConfig::default()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert!(matches!(result, FetchResult::HttpError { status_code: 404 }));
        assert_eq!(result.into_result(), Err("HTTP 404".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_network_error() {
        // Nothing listens on port 9 of localhost
        let fetcher = HttpFetcher::from_config(&UserAgentConfig::default()).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:9/").await;

        assert!(matches!(result, FetchResult::NetworkError { .. }));
    }
}
