use crate::config::types::{Config, CrawlerConfig, IndexConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_seeds(&config.seeds)?;
    validate_crawler_config(&config.crawler)?;
    validate_index_config(&config.index)?;
    Ok(())
}

/// Validates the seed list: at least one seed, each an absolute http(s) URL
fn validate_seeds(seeds: &[String]) -> Result<(), ConfigError> {
    if seeds.is_empty() {
        return Err(ConfigError::Validation(
            "no seeds configured (set `seeds` or SEARCH_DOMAINS)".to_string(),
        ));
    }

    for seed in seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' must use HTTP or HTTPS scheme",
                seed
            )));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::InvalidUrl(format!(
                "Seed URL '{}' has no host",
                seed
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_depth >= 0 is always true for u32, so no check needed

    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates search index connection settings
///
/// The API key is not checked here so that `--dry-run` works without one;
/// the Typesense sink rejects an empty key when it is constructed.
fn validate_index_config(config: &IndexConfig) -> Result<(), ConfigError> {
    if config.protocol != "http" && config.protocol != "https" {
        return Err(ConfigError::Validation(format!(
            "index protocol must be 'http' or 'https', got '{}'",
            config.protocol
        )));
    }

    if config.host.trim().is_empty() {
        return Err(ConfigError::Validation(
            "index host cannot be empty".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ConfigError::Validation(
            "index port must be non-zero".to_string(),
        ));
    }

    if config.collection.trim().is_empty() {
        return Err(ConfigError::Validation(
            "index collection cannot be empty".to_string(),
        ));
    }

    if config.connection_timeout_secs < 1 || config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "index timeouts must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}
