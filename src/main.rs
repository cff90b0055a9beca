//! pathloom-export main entry point
//!
//! This is the command-line interface for the blog-to-WordPress exporter.

use anyhow::Context;
use clap::Parser;
use pathloom_export::config::{load_config_with_hash, validate, Config};
use pathloom_export::crawler::crawl;
use pathloom_export::extract::SiteSignatures;
use pathloom_export::RunOutcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// pathloom-export: scrape a blog into a WordPress import file
///
/// Walks every listing page of the blog, visits each post in a browser and
/// writes the posts as one XML document of WordPress block markup.
#[derive(Parser, Debug)]
#[command(name = "pathloom-export")]
#[command(version)]
#[command(about = "Scrape a blog into a WordPress import file", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in defaults");
            let config = Config::default();
            validate(&config).context("Built-in configuration is invalid")?;
            config
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let outcome = crawl(&config).await.context("Export failed")?;
    if let RunOutcome::Aborted(reason) = &outcome {
        tracing::warn!("Crawl stopped early: {}", reason);
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
            0 => EnvFilter::new("pathloom_export=info,warn"),
            1 => EnvFilter::new("pathloom_export=debug,info"),
            2 => EnvFilter::new("pathloom_export=trace,debug"),
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

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== pathloom-export Dry Run ===\n");

    println!("Site:");
    println!("  Listing: {}/page/{{n}}", config.site.listing_url.trim_end_matches('/'));
    println!("  Post base: {}", config.site.post_base_url);
    println!("  Start page: {}", config.site.start_page);
    match config.site.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!(
        "  Signatures: {} (known: {})",
        config.site.signature_version,
        SiteSignatures::known_versions().join(", ")
    );

    println!("\nBrowser:");
    println!("  Driver: {:?}", config.browser.driver);
    println!("  Headless: {}", config.browser.headless);
    if let Some(executable) = &config.browser.chrome_executable {
        println!("  Chrome: {}", executable);
    }

    println!("\nPacing:");
    println!("  Listing settle: {}ms", config.pacing.listing_settle_ms);
    println!(
        "  Post delays: {}ms before, {}ms after",
        config.pacing.before_post_ms, config.pacing.post_settle_ms
    );
    println!(
        "  Scroll: {}px every {}ms",
        config.pacing.scroll_step_px, config.pacing.scroll_step_delay_ms
    );

    println!("\nRetry:");
    println!(
        "  {} attempts, {}ms base delay",
        config.retry.attempts, config.retry.base_delay_ms
    );

    println!("\nExtraction:");
    println!("  Dedup scope: {:?}", config.extraction.dedup_scope);

    println!("\nOutput:");
    println!("  File: {}", config.output.path);
    println!("  Image caption: {}", config.output.image_caption);

    println!("\n✓ Configuration is valid");
}
