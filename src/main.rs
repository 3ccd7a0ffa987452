//! Rifthop main entry point
//!
//! Command-line interface for the match-graph crawler.

use anyhow::Context;
use clap::Parser;
use rifthop::config::{load_config_with_hash, Config, OutputMode};
use rifthop::crawler::TracingObserver;
use rifthop::filter::build_filters;
use rifthop::model::Region;
use rifthop::output::{FileOutputHandler, OutputHandler, PrintOutputHandler};
use rifthop::source::{build_http_client, HttpRemoteSource, RemoteSource};
use rifthop::CrawlEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Rifthop: a match-graph crawler
///
/// Crawls the player graph of an online game starting from a seed player,
/// emitting every discovered match to the configured output, until it runs
/// out of acceptable players or is interrupted.
#[derive(Parser, Debug)]
#[command(name = "rifthop")]
#[command(version)]
#[command(about = "A rate-limited match-graph crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Display name of the seed player to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Region of the seed player (na, euw, eune, kr, ...)
    #[arg(short, long)]
    region: Region,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded (hash: {})", config_hash);

    if cli.dry_run {
        print_dry_run(&config, &cli.seed, cli.region);
        return Ok(());
    }

    run_crawl(config, &cli.seed, cli.region).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rifthop=info,warn"),
            1 => EnvFilter::new("rifthop=debug,info"),
            2 => EnvFilter::new("rifthop=trace,debug"),
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

/// Prints the validated configuration without starting a crawl
fn print_dry_run(config: &Config, seed: &str, region: Region) {
    println!("=== Rifthop Dry Run ===\n");

    println!("Seed: {} ({})", seed, region);

    println!("\nRemote API:");
    println!("  Base URL: {}", config.api.base_url);

    println!("\nCrawler:");
    println!("  Max matches per player: {}", config.crawler.max_matches);

    println!("\nVisited history:");
    println!("  Retention: {}s", config.history.retention_secs);
    println!("  Capacity: {}", config.history.capacity);

    println!("\nFilter cache:");
    println!("  TTL: {}s", config.filter_cache.ttl_secs);
    println!("  Capacity: {}", config.filter_cache.capacity);

    println!("\nFilters:");
    match config.filters.min_match_duration_secs {
        Some(secs) => println!("  Min match duration: {}s", secs),
        None => println!("  Min match duration: (none)"),
    }
    if config.filters.queues.is_empty() {
        println!("  Queues: (all)");
    } else {
        println!("  Queues: {:?}", config.filters.queues);
    }
    match config.filters.min_level {
        Some(level) => println!("  Min player level: {}", level),
        None => println!("  Min player level: (none)"),
    }
    match config.filters.min_rank {
        Some(rank) => println!("  Min player rank: {:?}", rank),
        None => println!("  Min player rank: (none)"),
    }

    println!("\nOutput:");
    match config.output.mode {
        OutputMode::Print => println!("  Mode: print"),
        OutputMode::File => println!(
            "  Mode: file ({})",
            config.output.directory.as_deref().unwrap_or("?")
        ),
    }

    println!("\n✓ Configuration is valid");
}

/// Wires up the engine and runs the crawl until it finishes or Ctrl-C
async fn run_crawl(config: Config, seed: &str, region: Region) -> anyhow::Result<()> {
    let client = build_http_client().context("failed to build HTTP client")?;
    let base_url = Url::parse(&config.api.base_url).context("invalid api.base-url")?;
    let source: Arc<dyn RemoteSource> = Arc::new(HttpRemoteSource::new(
        client,
        base_url,
        config.api.key.clone(),
    ));

    let filters = build_filters(&config);

    let output: Arc<dyn OutputHandler> = match config.output.mode {
        OutputMode::Print => Arc::new(PrintOutputHandler::new()),
        OutputMode::File => {
            let directory = config
                .output
                .directory
                .as_deref()
                .context("output.directory is required for file output")?;
            Arc::new(FileOutputHandler::new(Path::new(directory))?)
        }
    };

    let engine = Arc::new(CrawlEngine::new(source, &config, filters, output)?);
    engine.set_observer(Arc::new(TracingObserver));

    let started = engine.run(seed, region).await?;
    if !started {
        tracing::warn!("seed player was rejected by the player filter, nothing to crawl");
        return Ok(());
    }

    // Stop gracefully on Ctrl-C; the loop halts at its next iteration.
    let interrupt_engine = engine.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, stopping crawler");
            interrupt_engine.stop();
        }
    });

    engine.wait().await;

    match engine.last_error() {
        Some(e) => {
            tracing::error!("Crawl halted by remote failure: {}", e);
            Err(e.into())
        }
        None => {
            tracing::info!("Crawl finished");
            Ok(())
        }
    }
}
