//! Forum-Feed main entry point
//!
//! This is the command-line interface for the Forum-Feed publisher.

use anyhow::Context;
use clap::Parser;
use forum_feed::config::load_config_with_hash;
use forum_feed::publish::build_publisher;
use forum_feed::Scheduler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Forum-Feed: publish forum categories as RSS feeds
///
/// Crawls the first pages of every configured forum category, extracts
/// thread titles, bodies and attachments, and publishes one RSS feed per
/// category.
#[derive(Parser, Debug)]
#[command(name = "forum-feed")]
#[command(version)]
#[command(about = "Publish forum categories as RSS feeds", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Scrape the first N listing pages of each forum
    #[arg(long)]
    pages: Option<u32>,

    /// Seconds between repeated runs, 0 for a single run
    #[arg(long)]
    interval: Option<u64>,

    /// Skip crawling and publishing
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if let Some(pages) = cli.pages {
        config.crawler.pages = pages;
    }
    if let Some(interval) = cli.interval {
        config.crawler.interval = interval;
    }
    if cli.dry_run {
        config.crawler.dry_run = true;
    }
    config.validate().context("invalid command-line override")?;

    tracing::info!(
        "Forums: {}, pages: {}, interval: {}s, base URL: {}",
        config.forums.len(),
        config.crawler.pages,
        config.crawler.interval,
        config.crawler.base_url
    );

    let publisher = build_publisher(&config.publish).await;
    let scheduler = Scheduler::new(&config, publisher)?;

    match scheduler.run().await {
        Ok(cycles) => {
            tracing::info!("Finished after {} cycle(s)", cycles);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG`, when set, takes precedence over the flags.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("forum_feed=info,warn"),
                1 => EnvFilter::new("forum_feed=debug,info"),
                2 => EnvFilter::new("forum_feed=trace,debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
