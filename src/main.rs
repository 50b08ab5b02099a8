//! Crawldex main entry point
//!
//! This is the command-line interface for the Crawldex site crawler and indexer.

use anyhow::Context;
use clap::Parser;
use crawldex::config::{load_config_with_hash, Config};
use crawldex::crawler::{crawl_and_index, CrawlEngine};
use crawldex::index::{MemorySink, TypesenseSink};
use crawldex::output::{print_summary, CrawlSummary};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawldex: crawl seed sites and publish their pages to a search index
///
/// Each seed is crawled breadth-first, staying on the seed's domain, up to a
/// maximum link depth. Every HTML or PDF page becomes a document that is
/// upserted into a Typesense collection.
#[derive(Parser, Debug)]
#[command(name = "crawldex")]
#[command(version = "1.0.0")]
#[command(about = "Crawl seed sites into a search index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (optional; environment overrides apply either way)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Crawl without contacting the search index and print what would be indexed
    #[arg(long, conflicts_with = "reset_index")]
    dry_run: bool,

    /// Drop and recreate the collection before crawling
    #[arg(long)]
    reset_index: bool,

    /// Override the configured maximum link depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("No configuration file given, using defaults and environment"),
    }
    let (mut config, config_hash) =
        load_config_with_hash(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded successfully (hash: {})", hash);
    }

    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }

    let mut summary = CrawlSummary::start(config_hash, cli.dry_run);
    if cli.dry_run {
        handle_dry_run(&config, &mut summary).await?;
    } else {
        handle_crawl(&config, cli.reset_index, &mut summary).await?;
    }
    summary.finish();

    if !cli.quiet {
        print_summary(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawldex=info,warn"),
            1 => EnvFilter::new("crawldex=debug,info"),
            2 => EnvFilter::new("crawldex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: crawls into memory and lists the documents
async fn handle_dry_run(config: &Config, summary: &mut CrawlSummary) -> anyhow::Result<()> {
    let engine = CrawlEngine::new(config.crawler.clone()).context("Failed to build HTTP client")?;
    let sink = MemorySink::new();

    tracing::info!("Dry run: {} seed(s), nothing will be indexed", config.seeds.len());
    crawl_and_index(&engine, &sink, &config.seeds, false, summary).await;

    println!("=== Crawldex Dry Run ===\n");
    for document in sink.documents() {
        println!(
            "  [{}] {} - {} ({} words)",
            document.popularity, document.url, document.title, document.word_count
        );
    }
    println!();

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: &Config,
    reset_index: bool,
    summary: &mut CrawlSummary,
) -> anyhow::Result<()> {
    let engine = CrawlEngine::new(config.crawler.clone()).context("Failed to build HTTP client")?;
    let sink =
        TypesenseSink::new(&config.index).context("Failed to set up the search index client")?;

    tracing::info!(
        "Seeds: {}, max depth: {}, index: {}",
        config.seeds.len(),
        config.crawler.max_depth,
        config.index.base_url()
    );

    crawl_and_index(&engine, &sink, &config.seeds, reset_index, summary).await;

    tracing::info!("Crawldexing completed");
    Ok(())
}
