//! Typesense REST index sink
//!
//! Talks to a single Typesense node over its HTTP API:
//! - `POST /collections` to create the collection (409 = already exists)
//! - `DELETE /collections/{name}` to drop it (404 = not found)
//! - `POST /collections/{name}/documents/import?action=upsert` with a JSONL
//!   body to upsert documents

use super::schema::collection_schema;
use super::traits::{IndexError, IndexResult, IndexSink};
use crate::config::IndexConfig;
use crate::extract::Document;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Header carrying the admin API key (`X-TYPESENSE-API-KEY`)
pub const API_KEY_HEADER: &str = "x-typesense-api-key";

/// One line of an import response
#[derive(Debug, Deserialize)]
struct ImportLine {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    document: Option<String>,
}

/// Index sink backed by a Typesense collection
#[derive(Debug, Clone)]
pub struct TypesenseSink {
    client: Client,
    base_url: String,
    collection: String,
}

impl TypesenseSink {
    /// Builds a sink from the index configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TypesenseSink)` - Ready to use; no request is made yet
    /// * `Err(IndexError::Config)` - The API key is empty or not a valid header value
    /// * `Err(IndexError::Http)` - The HTTP client could not be built
    pub fn new(config: &IndexConfig) -> IndexResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(IndexError::Config(
                "an API key is required (set index.api-key or TYPESENSE_INTERNAL_API_KEY)"
                    .to_string(),
            ));
        }

        let mut api_key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|e| IndexError::Config(format!("invalid API key: {}", e)))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connection_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            collection: config.collection.clone(),
        })
    }

    fn collections_url(&self) -> String {
        format!("{}/collections", self.base_url)
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn delete_collection(&self) -> IndexResult<()> {
        let response = self.client.delete(self.collection_url()).send().await?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!("Deleted collection '{}'", self.collection);
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                tracing::info!("Collection '{}' does not exist", self.collection);
                Ok(())
            }
            status => Err(status_error(status, response).await),
        }
    }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> IndexError {
    IndexError::Status {
        status: status.as_u16(),
        body: response.text().await.unwrap_or_default(),
    }
}

/// Serializes documents as newline-delimited JSON
fn to_jsonl(documents: &[Document]) -> IndexResult<String> {
    let lines = documents
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

/// Counts accepted documents in an import response, logging rejections
fn count_imported(body: &str) -> usize {
    let mut imported = 0;
    for line in body.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<ImportLine>(line) {
            Ok(result) if result.success => imported += 1,
            Ok(result) => tracing::warn!(
                "Document rejected: {} ({})",
                result.error.unwrap_or_default(),
                result.document.unwrap_or_default()
            ),
            Err(e) => tracing::warn!("Unreadable import result '{}': {}", line, e),
        }
    }
    imported
}

#[async_trait]
impl IndexSink for TypesenseSink {
    async fn ensure_schema(&self) -> IndexResult<()> {
        let response = self
            .client
            .post(self.collections_url())
            .json(&collection_schema(&self.collection))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                tracing::info!("Created collection '{}'", self.collection);
                Ok(())
            }
            StatusCode::CONFLICT => {
                tracing::info!("Collection '{}' already exists", self.collection);
                Ok(())
            }
            status => Err(status_error(status, response).await),
        }
    }

    async fn upsert_batch(&self, documents: &[Document]) -> IndexResult<usize> {
        if documents.is_empty() {
            tracing::info!("Nothing to index.");
            return Ok(0);
        }

        let response = self
            .client
            .post(format!("{}/documents/import", self.collection_url()))
            .query(&[("action", "upsert")])
            .header(CONTENT_TYPE, "text/plain")
            .body(to_jsonl(documents)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }

        let imported = count_imported(&response.text().await?);
        tracing::info!(
            "Indexed {}/{} documents into '{}'",
            imported,
            documents.len(),
            self.collection
        );
        Ok(imported)
    }

    async fn reset(&self) -> IndexResult<()> {
        self.delete_collection().await?;
        self.ensure_schema().await
    }
}
