//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Link discovery and priority tiers
//! - The per-run frontier
//! - Wave-based crawl orchestration
//! - Publishing each seed's documents to an index sink

mod engine;
mod fetcher;
mod frontier;
mod links;

pub use engine::{CrawlEngine, SeedReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage};
pub use frontier::{Frontier, FrontierEntry};
pub use links::{
    discover, discover_in, has_banned_extension, priority_tier, DiscoveredLink,
    BANNED_EXTENSIONS, DEFAULT_PRIORITY,
};

use crate::index::IndexSink;
use crate::output::{CrawlSummary, SeedSummary};

/// Crawls every seed in turn and upserts each seed's documents
///
/// This is the main entry point for a crawl operation. It will:
/// 1. Optionally drop and recreate the collection
/// 2. Make sure the collection exists
/// 3. Crawl each seed, one after another
/// 4. Upsert the seed's documents as soon as its crawl completes
///
/// Failures are logged and recorded on the seed's summary; one seed's failure
/// never stops the others.
///
/// # Arguments
///
/// * `engine` - The crawl engine
/// * `sink` - Where documents are published
/// * `seeds` - Seed URLs
/// * `reset` - Whether to drop the collection first
/// * `summary` - Run summary that receives one entry per seed
pub async fn crawl_and_index(
    engine: &CrawlEngine,
    sink: &dyn IndexSink,
    seeds: &[String],
    reset: bool,
    summary: &mut CrawlSummary,
) {
    if reset {
        match sink.reset().await {
            Ok(()) => tracing::info!("Search index reset"),
            Err(e) => tracing::error!("Failed to reset search index: {}", e),
        }
    } else if let Err(e) = sink.ensure_schema().await {
        tracing::error!("Failed to create collection: {}", e);
    }

    for seed in seeds {
        tracing::info!("Crawling domain: {}", seed);

        let report = match engine.crawl_seed(seed).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!("Failed to crawl {}: {}", seed, e);
                summary.seeds.push(SeedSummary {
                    seed: seed.clone(),
                    domain: String::new(),
                    stats: Default::default(),
                    indexed: 0,
                    index_error: Some(e.to_string()),
                });
                continue;
            }
        };

        let (indexed, index_error) = match sink.upsert_batch(&report.documents).await {
            Ok(indexed) => (indexed, None),
            Err(e) => {
                tracing::error!("Failed to index documents for {}: {}", seed, e);
                (0, Some(e.to_string()))
            }
        };

        summary.seeds.push(SeedSummary {
            seed: report.seed,
            domain: report.domain,
            stats: report.stats,
            indexed,
            index_error,
        });
    }
}
