use crate::config::types::{Config, CrawlerConfig, DatabaseConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

const MAX_WORKERS: usize = 256;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_database_config(&config.database)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid crawler url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Crawler url '{}' must use http or https",
            config.url
        )));
    }

    if config.interval < 1 {
        return Err(ConfigError::Validation(format!(
            "interval must be >= 1 second, got {}",
            config.interval
        )));
    }

    if config.pastes_path.is_empty() {
        return Err(ConfigError::Validation(
            "pastes_path cannot be empty".to_string(),
        ));
    }

    if let Some(workers) = config.max_workers {
        if workers < 1 || workers > MAX_WORKERS {
            return Err(ConfigError::Validation(format!(
                "max_workers must be between 1 and {}, got {}",
                MAX_WORKERS, workers
            )));
        }
    }

    Ok(())
}

/// Validates database configuration
fn validate_database_config(config: &DatabaseConfig) -> Result<(), ConfigError> {
    if config.path.is_empty() {
        return Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if let Some(contact_url) = &config.contact_url {
        Url::parse(contact_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;
    }

    Ok(())
}
