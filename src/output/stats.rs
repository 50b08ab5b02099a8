//! Crawl statistics
//!
//! This module provides the per-run counters collected by the crawl engine
//! and the formatted run summary printed at the end of a crawl.

use super::CrawlSummary;

/// Counters for one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// URLs handed to a worker
    pub pages_dispatched: u64,

    /// Documents extracted
    pub documents: u64,

    /// Fetches that failed (network error, timeout, non-2xx)
    pub fetch_failures: u64,

    /// Fetched responses that produced no document (skipped or unreadable)
    pub extract_skips: u64,

    /// Same-domain links found on fetched pages, before deduplication
    pub links_discovered: u64,

    /// Dispatch waves run
    pub waves: u32,
}

impl CrawlStats {
    /// Adds another run's counters to this one
    pub fn merge(&mut self, other: &CrawlStats) {
        self.pages_dispatched += other.pages_dispatched;
        self.documents += other.documents;
        self.fetch_failures += other.fetch_failures;
        self.extract_skips += other.extract_skips;
        self.links_discovered += other.links_discovered;
        self.waves += other.waves;
    }

    /// Percentage of dispatched pages that became documents
    pub fn success_rate(&self) -> f64 {
        if self.pages_dispatched > 0 {
            (self.documents as f64 / self.pages_dispatched as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    if let Some(hash) = &summary.config_hash {
        println!("Config hash: {}", hash);
    }
    println!("Started: {}", summary.started_at.to_rfc3339());
    println!("Duration: {}s", summary.duration_seconds());
    if summary.dry_run {
        println!("Mode: dry run (nothing sent to the search index)");
    }
    println!();

    for seed in &summary.seeds {
        println!("{} ({})", seed.seed, seed.domain);
        println!(
            "  Pages dispatched: {} in {} wave(s)",
            seed.stats.pages_dispatched, seed.stats.waves
        );
        println!("  Documents: {}", seed.stats.documents);
        println!("  Links discovered: {}", seed.stats.links_discovered);
        println!("  Fetch failures: {}", seed.stats.fetch_failures);
        println!("  Extraction skips: {}", seed.stats.extract_skips);
        match &seed.index_error {
            Some(error) => println!("  Indexing failed: {}", error),
            None => println!("  Indexed: {}", seed.indexed),
        }
        println!();
    }

    let totals = summary.totals();
    println!(
        "Success Rate: {:.1}% ({} / {} pages became documents)",
        totals.success_rate(),
        totals.documents,
        totals.pages_dispatched
    );
    println!("Total indexed: {}", summary.total_indexed());
}
