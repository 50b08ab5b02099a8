use serde::Deserialize;

/// Main configuration structure for Crawldex
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Seed URLs; each one is crawled as a separate, domain-scoped run
    #[serde(default)]
    pub seeds: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(default)]
    pub index: IndexConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link depth to crawl from a seed URL (the seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Size of the worker pool used within each wave
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-request network timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_workers: default_max_workers(),
            request_timeout_secs: default_request_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Search index (Typesense) connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// `http` or `https`
    #[serde(default = "default_protocol")]
    pub protocol: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Admin API key sent as `X-TYPESENSE-API-KEY`
    #[serde(rename = "api-key", default)]
    pub api_key: String,

    /// Name of the collection documents are upserted into
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Connection establishment timeout (seconds)
    #[serde(
        rename = "connection-timeout-secs",
        default = "default_connection_timeout"
    )]
    pub connection_timeout_secs: u64,

    /// Whole-request timeout, covering large import batches (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_index_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            host: default_host(),
            port: default_port(),
            api_key: String::new(),
            collection: default_collection(),
            connection_timeout_secs: default_connection_timeout(),
            request_timeout_secs: default_index_request_timeout(),
        }
    }
}

impl IndexConfig {
    /// Base URL of the Typesense node, e.g. `http://localhost:8108`
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_max_workers() -> usize {
    5
}

fn default_request_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_protocol() -> String {
    "http".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8108
}

fn default_collection() -> String {
    "webpages".to_string()
}

fn default_connection_timeout() -> u64 {
    2
}

fn default_index_request_timeout() -> u64 {
    60
}
