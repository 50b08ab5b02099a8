//! Crawl engine - per-seed crawl orchestration
//!
//! This module contains the wave loop that drives one crawl run:
//! - Seeding a fresh frontier with the seed URL
//! - Dispatching each wave through a bounded worker pool
//! - Fetching, extracting and discovering links on the worker that owns the fetch
//! - Offering discovered links back to the frontier for the next wave
//! - Accumulating documents until the frontier is exhausted

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::links::{discover_in, DiscoveredLink};
use crate::extract::{extract_page, Document};
use crate::output::CrawlStats;
use crate::url::{extract_domain, parse_http_url};
use crate::{CrawldexError, UrlError};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Everything one seed's crawl produced
#[derive(Debug, Clone)]
pub struct SeedReport {
    /// The seed URL as given
    pub seed: String,

    /// Network location the crawl was scoped to
    pub domain: String,

    /// Documents from every wave, in completion order
    pub documents: Vec<Document>,

    pub stats: CrawlStats,
}

#[derive(Debug, Default)]
struct RunResults {
    documents: Vec<Document>,
    stats: CrawlStats,
}

/// State of one crawl run, shared by the workers of every wave
struct CrawlRun {
    /// Seed URL; links are kept only if they share its network location
    seed: Url,
    frontier: Frontier,
    results: Mutex<RunResults>,
}

impl CrawlRun {
    fn record<F: FnOnce(&mut RunResults)>(&self, update: F) {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        update(&mut results);
    }

    fn take_results(&self) -> RunResults {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *results)
    }
}

/// Crawls one seed at a time into a list of documents
pub struct CrawlEngine {
    config: Arc<CrawlerConfig>,
    client: Client,
}

impl CrawlEngine {
    /// Creates an engine with an HTTP client built from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Ready to crawl
    /// * `Err(CrawldexError)` - The HTTP client could not be built
    pub fn new(config: CrawlerConfig) -> Result<Self, CrawldexError> {
        let client = build_http_client(&config)?;
        Ok(Self::with_client(config, client))
    }

    /// Creates an engine around an existing HTTP client
    pub fn with_client(config: CrawlerConfig, client: Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls everything reachable from `seed` within the configured depth
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Document>)` - Documents from every wave; empty if even the
    ///   seed could not be fetched
    /// * `Err(CrawldexError)` - The seed is not an absolute http(s) URL
    pub async fn crawl(&self, seed: &str) -> Result<Vec<Document>, CrawldexError> {
        Ok(self.crawl_seed(seed).await?.documents)
    }

    /// Like [`crawl`](Self::crawl), also returning the run's counters
    pub async fn crawl_seed(&self, seed: &str) -> Result<SeedReport, CrawldexError> {
        let seed_url = parse_http_url(seed)?;
        let domain = extract_domain(&seed_url).ok_or(UrlError::MissingDomain)?;

        let frontier = Frontier::new(self.config.max_depth, self.config.max_workers);
        frontier.seed(seed)?;

        let run = Arc::new(CrawlRun {
            seed: seed_url,
            frontier,
            results: Mutex::new(RunResults::default()),
        });

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            seed,
            self.config.max_depth,
            self.config.max_workers
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers.max(1)));

        while let Some(depth) = run.frontier.begin_wave() {
            tracing::debug!(
                "Wave at depth {}: {} URLs queued",
                depth,
                run.frontier.queued_len()
            );
            run.record(|r| r.stats.waves += 1);

            let mut tasks = JoinSet::new();
            loop {
                let batch = run.frontier.pop_ready();
                if batch.is_empty() {
                    break;
                }

                for entry in batch {
                    let permit = semaphore
                        .clone()
                        .acquire_owned()
                        .await
                        .map_err(|e| CrawldexError::Worker(e.to_string()))?;
                    let run = Arc::clone(&run);
                    let client = self.client.clone();

                    tasks.spawn(async move {
                        let _permit = permit;
                        process_entry(&client, &run, entry).await;
                    });
                }
            }

            // The next wave may only start once every link of this one is offered
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::error!("Worker task failed: {}", e);
                }
            }
        }

        let results = run.take_results();
        tracing::info!(
            "Finished crawl of {}: {} documents from {} pages ({} failed)",
            seed,
            results.stats.documents,
            run.frontier.dispatched_count(),
            results.stats.fetch_failures
        );

        Ok(SeedReport {
            seed: seed.to_string(),
            domain,
            documents: results.documents,
            stats: results.stats,
        })
    }
}

/// Fetches one frontier entry and hands the response to extraction
async fn process_entry(client: &Client, run: &CrawlRun, entry: FrontierEntry) {
    tracing::info!("Crawling: {}", entry.url);
    run.record(|r| r.stats.pages_dispatched += 1);

    match fetch_url(client, &entry.url).await {
        FetchResult::Success(page) => handle_page(run, &entry, &page),
        FetchResult::HttpError { status_code } => {
            tracing::warn!("Failed to fetch {}: HTTP {}", entry.url, status_code);
            run.record(|r| r.stats.fetch_failures += 1);
        }
        FetchResult::NetworkError { error, timed_out } => {
            if timed_out {
                tracing::warn!("Timed out fetching {}", entry.url);
            } else {
                tracing::warn!("Failed to fetch {}: {}", entry.url, error);
            }
            run.record(|r| r.stats.fetch_failures += 1);
        }
    }
}

/// Extracts a document and outbound links from a fetched page
///
/// Runs synchronously on the worker after its fetch completes; the parsed
/// HTML tree never outlives this call. Links resolve against the requested
/// URL, so a seed that redirects to another host keeps its relative links in
/// scope.
fn handle_page(run: &CrawlRun, entry: &FrontierEntry, page: &FetchedPage) {
    let url = match Url::parse(&entry.url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Skipping {}: {}", entry.url, e);
            run.record(|r| r.stats.extract_skips += 1);
            return;
        }
    };

    if page.final_url.origin() != url.origin() {
        tracing::debug!("{} redirected to {}", entry.url, page.final_url);
    }

    let extracted = extract_page(&url, page);
    let links = extracted
        .html
        .as_ref()
        .map(|html| discover_in(html, &url, &run.seed))
        .unwrap_or_default();
    let document = extracted.into_document(&entry.url);

    let queued = offer_links(&run.frontier, &links, entry.depth + 1);
    tracing::debug!(
        "{}: {} links found, {} queued",
        entry.url,
        links.len(),
        queued
    );

    run.record(|r| {
        r.stats.links_discovered += links.len() as u64;
        match document {
            Some(mut document) => {
                document.apply_priority(entry.priority);
                r.documents.push(document);
                r.stats.documents += 1;
            }
            None => r.stats.extract_skips += 1,
        }
    });
}

/// Offers links in their sorted order; returns how many were queued
fn offer_links(frontier: &Frontier, links: &[DiscoveredLink], depth: u32) -> usize {
    links
        .iter()
        .filter(|link| frontier.offer(&link.url, depth, link.priority))
        .count()
}
