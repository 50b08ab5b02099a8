//! Output module for crawl summaries
//!
//! This module handles:
//! - Per-run crawl counters ([`CrawlStats`])
//! - Aggregating per-seed results into a [`CrawlSummary`]
//! - Printing the summary at the end of a run

pub mod stats;

pub use stats::{print_summary, CrawlStats};

use chrono::{DateTime, Utc};

/// Outcome of crawling and indexing one seed
#[derive(Debug, Clone)]
pub struct SeedSummary {
    /// The seed URL as configured
    pub seed: String,

    /// Network location the crawl was scoped to
    pub domain: String,

    pub stats: CrawlStats,

    /// Documents accepted by the index sink
    pub indexed: usize,

    /// Crawl or indexing failure for this seed, if any
    pub index_error: Option<String>,
}

/// Summary of a whole crawl invocation
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// SHA-256 of the configuration file, when one was used
    pub config_hash: Option<String>,

    pub dry_run: bool,

    pub seeds: Vec<SeedSummary>,
}

impl CrawlSummary {
    /// Starts an empty summary stamped with the current time
    pub fn start(config_hash: Option<String>, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            config_hash,
            dry_run,
            seeds: Vec::new(),
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, if unfinished)
    pub fn duration_seconds(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds().max(0)
    }

    /// Counters summed over every seed
    pub fn totals(&self) -> CrawlStats {
        let mut totals = CrawlStats::default();
        for seed in &self.seeds {
            totals.merge(&seed.stats);
        }
        totals
    }

    pub fn total_indexed(&self) -> usize {
        self.seeds.iter().map(|s| s.indexed).sum()
    }

    /// Number of seeds whose crawl or indexing failed
    pub fn failed_seeds(&self) -> usize {
        self.seeds.iter().filter(|s| s.index_error.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(documents: u64, indexed: usize, error: Option<&str>) -> SeedSummary {
        SeedSummary {
            seed: "https://a.example/".to_string(),
            domain: "a.example".to_string(),
            stats: CrawlStats {
                pages_dispatched: documents + 1,
                documents,
                ..CrawlStats::default()
            },
            indexed,
            index_error: error.map(str::to_string),
        }
    }

    #[test]
    fn test_totals() {
        let mut summary = CrawlSummary::start(None, false);
        summary.seeds.push(seed(3, 3, None));
        summary.seeds.push(seed(2, 0, Some("status 503")));
        summary.finish();

        assert_eq!(summary.totals().documents, 5);
        assert_eq!(summary.totals().pages_dispatched, 7);
        assert_eq!(summary.total_indexed(), 3);
        assert_eq!(summary.failed_seeds(), 1);
        assert!(summary.duration_seconds() >= 0);
    }
}
