//! Crawler module for walking the blog and scraping posts
//!
//! This module contains the core crawling logic, including:
//! - The listing/post crawl loop
//! - Post metadata collection
//! - Page pacing and slow scrolling
//! - Shutdown handling and the final flush

mod coordinator;
mod metadata;
mod pacing;

pub use coordinator::{run_with_driver, Coordinator};
pub use metadata::MetadataCollector;
pub use pacing::{pause, scroll_to_bottom};

use crate::config::{Config, DriverKind};
use crate::driver::{ChromeDriver, PageDriver, StaticDriver};
use crate::output::save_posts;
use crate::state::{RunAccumulator, RunOutcome};
use crate::Result;

/// Runs a complete export
///
/// This is the main entry point for starting a run. It will:
/// 1. Open the configured page driver
/// 2. Crawl until the listing runs out, a listing step fails, or a shutdown
///    signal arrives
/// 3. Close the driver
/// 4. Write every post collected so far
///
/// # Arguments
///
/// * `config` - The exporter configuration
///
/// # Returns
///
/// * `Ok(RunOutcome)` - How the crawl ended; the posts were flushed
/// * `Err(ScrapeError)` - The driver could not be opened or the output
///   could not be written
pub async fn crawl(config: &Config) -> Result<RunOutcome> {
    let accumulator = RunAccumulator::new();

    let outcome = match config.browser.driver {
        DriverKind::Chrome => {
            let driver = ChromeDriver::launch(&config.browser).await?;
            run_and_close(&driver, config, &accumulator).await
        }
        DriverKind::Static => {
            let driver = StaticDriver::new(&config.browser)?;
            run_and_close(&driver, config, &accumulator).await
        }
    };

    tracing::info!("Run {}", outcome);
    save_posts(&accumulator.snapshot(), &config.output)?;
    Ok(outcome)
}

async fn run_and_close<D: PageDriver>(
    driver: &D,
    config: &Config,
    accumulator: &RunAccumulator,
) -> RunOutcome {
    let outcome = run_with_driver(driver, config, accumulator, shutdown_signal()).await;
    if let Err(e) = driver.close().await {
        tracing::warn!("Failed to close the page driver: {}", e);
    }
    outcome
}

/// Resolves on Ctrl-C, or on SIGTERM on unix
///
/// A signal handler that cannot be installed never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
