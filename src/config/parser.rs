use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Comma-separated seed list
pub const ENV_SEARCH_DOMAINS: &str = "SEARCH_DOMAINS";
pub const ENV_INDEX_HOST: &str = "TYPESENSE_INTERNAL_HOST";
pub const ENV_INDEX_PORT: &str = "TYPESENSE_INTERNAL_PORT";
pub const ENV_INDEX_PROTOCOL: &str = "TYPESENSE_INTERNAL_PROTOCOL";
pub const ENV_INDEX_API_KEY: &str = "TYPESENSE_INTERNAL_API_KEY";

/// Parses configuration from TOML text without validating it
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Loads, overrides and validates the configuration
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file. Without a file,
///   every setting starts from its default.
///
/// Environment variables (`SEARCH_DOMAINS`, `TYPESENSE_INTERNAL_*`) are
/// applied on top of the file before validation.
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use crawldex::config::load_config;
///
/// let config = load_config(Some(Path::new("crawldex.toml"))).unwrap();
/// println!("Max depth: {}", config.crawler.max_depth);
/// ```
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides using the given variable lookup
///
/// A non-empty `SEARCH_DOMAINS` replaces the configured seeds; blank entries
/// in the comma-separated list are skipped.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(domains) = lookup(ENV_SEARCH_DOMAINS) {
        config.seeds = domains
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(host) = lookup(ENV_INDEX_HOST) {
        config.index.host = host;
    }

    if let Some(port) = lookup(ENV_INDEX_PORT) {
        config.index.port = port.parse().map_err(|_| ConfigError::InvalidValue {
            key: ENV_INDEX_PORT.to_string(),
            value: port.clone(),
        })?;
    }

    if let Some(protocol) = lookup(ENV_INDEX_PROTOCOL) {
        config.index.protocol = protocol;
    }

    if let Some(api_key) = lookup(ENV_INDEX_API_KEY) {
        config.index.api_key = api_key;
    }

    Ok(())
}

/// Computes a SHA-256 hash of the configuration file content
///
/// This identifies which configuration a crawl run was started with.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and the file hash
///
/// The hash is `None` when no configuration file was given.
pub fn load_config_with_hash(path: Option<&Path>) -> ConfigResult<(Config, Option<String>)> {
    let config = load_config(path)?;
    let hash = path.map(compute_config_hash).transpose()?;
    Ok((config, hash))
}
