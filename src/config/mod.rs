//! Configuration module for Crawldex
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file and the environment overrides layered on top of it. The resulting
//! [`Config`] is built once at start-up and passed into the crawl engine and
//! the index sink.
//!
//! # Example
//!
//! ```no_run
//! use crawldex::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Some(Path::new("crawldex.toml"))).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, IndexConfig};

// Re-export parser functions
pub use parser::{
    apply_env_overrides, compute_config_hash, load_config, load_config_with_hash, parse_config,
    ENV_INDEX_API_KEY, ENV_INDEX_HOST, ENV_INDEX_PORT, ENV_INDEX_PROTOCOL, ENV_SEARCH_DOMAINS,
};
pub use validation::validate;
