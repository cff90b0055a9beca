//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, which:
//! - Walks the paginated listing one page at a time
//! - Collects post links and their cover images
//! - Visits each post and gathers its metadata and content
//! - Appends finished posts to the run accumulator
//!
//! The loop is strictly sequential. A failing post is logged and skipped; a
//! failing listing step ends the run.

use crate::config::{Config, DedupScope, PacingConfig};
use crate::crawler::metadata::MetadataCollector;
use crate::crawler::pacing::{pause, scroll_to_bottom};
use crate::driver::{ElementHandle, PageDriver};
use crate::extract::{ContentExtractor, DedupState, SiteSignatures};
use crate::retry::{retry, RetryPolicy};
use crate::state::{CrawlStats, Post, RunAccumulator, RunOutcome};
use crate::{ConfigError, Result};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

/// Post links and cover images read from one listing page
#[derive(Debug, Default)]
struct Listing {
    links: Vec<String>,
    thumbnails: Vec<String>,
}

/// Main crawler coordinator structure
pub struct Coordinator<'a, D: PageDriver> {
    driver: &'a D,
    config: &'a Config,
    signatures: &'static SiteSignatures,
    retry: RetryPolicy,
    accumulator: &'a RunAccumulator,
    extractor: ContentExtractor<'static>,
    metadata: MetadataCollector<'static>,
    run_dedup: DedupState,
    visited: HashSet<String>,
    stats: CrawlStats,
}

impl<'a, D: PageDriver> Coordinator<'a, D> {
    /// Creates a coordinator over an open driver
    ///
    /// # Arguments
    ///
    /// * `driver` - The page driver to crawl with
    /// * `config` - The exporter configuration
    /// * `accumulator` - Where finished posts are appended
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScrapeError)` - The configured signature version is unknown
    pub fn new(driver: &'a D, config: &'a Config, accumulator: &'a RunAccumulator) -> Result<Self> {
        let signatures = SiteSignatures::for_version(&config.site.signature_version).ok_or_else(|| {
            ConfigError::Validation(format!(
                "Unknown signature-version '{}'",
                config.site.signature_version
            ))
        })?;
        let retry = RetryPolicy::from(&config.retry);

        Ok(Self {
            driver,
            config,
            signatures,
            retry,
            accumulator,
            extractor: ContentExtractor::new(signatures, retry),
            metadata: MetadataCollector::new(&signatures.metadata, retry),
            run_dedup: DedupState::new(),
            visited: HashSet::new(),
            stats: CrawlStats::default(),
        })
    }

    fn pacing(&self) -> &'a PacingConfig {
        &self.config.pacing
    }

    /// Runs the crawl loop until the listing runs out
    ///
    /// Returns an error only when a listing-level step fails after its
    /// retries. Posts appended before that point stay in the accumulator.
    pub async fn run(&mut self) -> Result<CrawlStats> {
        let config = self.config;
        let site = &config.site;
        let listing_base = site.listing_url.trim_end_matches('/');
        let mut page = site.start_page;

        tracing::info!(
            "Starting crawl of {} (signatures {})",
            listing_base,
            self.signatures.version
        );

        loop {
            if let Some(max_pages) = site.max_pages {
                if self.stats.pages_visited >= max_pages {
                    tracing::info!("Reached max-pages ({}), stopping", max_pages);
                    break;
                }
            }

            let listing_url = format!("{}/page/{}", listing_base, page);
            tracing::info!("Scraping page {}...", page);

            let listing = match self.read_listing(&listing_url).await? {
                Some(listing) => listing,
                None => {
                    tracing::info!("No post links on page {}, crawl complete", page);
                    break;
                }
            };

            self.stats.pages_visited += 1;
            self.stats.links_seen += listing.links.len() as u32;

            if listing.links.iter().all(|link| self.visited.contains(link)) {
                tracing::info!(
                    "Every link on page {} was already visited, crawl complete",
                    page
                );
                break;
            }

            for (position, link) in listing.links.iter().enumerate() {
                if !self.visited.insert(link.clone()) {
                    tracing::debug!("Skipping already visited link: {}", link);
                    self.stats.links_skipped += 1;
                    continue;
                }

                let thumbnail = listing.thumbnails.get(position).cloned().unwrap_or_default();
                tracing::info!("Blog link: {}", link);

                match self.scrape_post(link, thumbnail).await {
                    Ok(post) => {
                        self.accumulator.push(post);
                        self.stats.posts_saved += 1;
                    }
                    Err(e) => {
                        tracing::error!("Failed to scrape {}: {}", link, e);
                        self.stats.posts_failed += 1;
                    }
                }
            }

            page += 1;
        }

        tracing::info!("Crawl finished: {}", self.stats);
        Ok(self.stats)
    }

    /// Loads a listing page and reads its links; `None` when it has none
    async fn read_listing(&self, url: &str) -> Result<Option<Listing>> {
        let driver = self.driver;
        let pacing = self.pacing();
        let selectors = &self.signatures.listing;

        retry(&self.retry, "listing navigation", move || driver.navigate(url)).await?;

        let thumbnails = self.read_thumbnails().await?;

        pause(pacing.listing_settle_ms).await;
        retry(&self.retry, "listing scroll", move || scroll_to_bottom(driver, pacing)).await?;

        let timeout = Duration::from_millis(pacing.wait_timeout_ms);
        let post_links = selectors.post_links;
        let anchors = match retry(&self.retry, "post links", move || {
            driver.wait_for_elements(post_links, timeout)
        })
        .await
        {
            Ok(anchors) => anchors,
            Err(e) if e.is_timeout() => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut links = Vec::with_capacity(anchors.len());
        for anchor in &anchors {
            if let Some(href) = retry(&self.retry, "post link href", move || anchor.attribute("href")).await? {
                links.push(href);
            }
        }

        if links.is_empty() {
            return Ok(None);
        }

        tracing::debug!(
            "Found {} post links and {} thumbnails on {}",
            links.len(),
            thumbnails.len(),
            url
        );
        Ok(Some(Listing { links, thumbnails }))
    }

    /// Cover image URLs in listing order, placeholders left out
    async fn read_thumbnails(&self) -> Result<Vec<String>> {
        let driver = self.driver;
        let selector = self.signatures.listing.thumbnails;
        let images = retry(&self.retry, "thumbnails", move || driver.locate(selector)).await?;

        let mut thumbnails = Vec::with_capacity(images.len());
        for image in &images {
            if let Some(src) = retry(&self.retry, "thumbnail src", move || image.attribute("src")).await? {
                if !src.is_empty() && !src.contains("blur") {
                    thumbnails.push(src);
                }
            }
        }
        Ok(thumbnails)
    }

    /// Visits one post and builds its record
    async fn scrape_post(&mut self, link: &str, thumbnail: String) -> Result<Post> {
        let driver = self.driver;
        let config = self.config;
        let pacing = &config.pacing;

        pause(pacing.before_post_ms).await;
        retry(&self.retry, "post navigation", move || driver.navigate(link)).await?;

        pause(pacing.post_settle_ms).await;
        retry(&self.retry, "post scroll", move || scroll_to_bottom(driver, pacing)).await?;

        let metadata = self.metadata.collect(driver, link).await?;

        if let Err(e) = driver.hide_elements(self.signatures.overlays).await {
            tracing::warn!("Could not hide overlays on {}: {}", link, e);
        }

        let content = match config.extraction.dedup_scope {
            DedupScope::Post => self.extractor.extract(driver, &mut DedupState::new()).await,
            DedupScope::Run => self.extractor.extract(driver, &mut self.run_dedup).await,
        };
        tracing::debug!("Extracted {} content blocks from {}", content.len(), link);

        Ok(Post::new(
            link,
            &config.site.post_base_url,
            thumbnail,
            metadata,
            content,
        ))
    }
}

/// Runs the crawl over `driver` until it ends or `shutdown` resolves
///
/// Posts land in `accumulator` as they are finished, so whatever the
/// outcome, the accumulator holds every post completed before it.
pub async fn run_with_driver<D, S>(
    driver: &D,
    config: &Config,
    accumulator: &RunAccumulator,
    shutdown: S,
) -> RunOutcome
where
    D: PageDriver,
    S: Future<Output = ()>,
{
    let mut coordinator = match Coordinator::new(driver, config, accumulator) {
        Ok(coordinator) => coordinator,
        Err(e) => return RunOutcome::Aborted(e.to_string()),
    };

    tokio::select! {
        result = coordinator.run() => match result {
            Ok(stats) => RunOutcome::Completed(stats),
            Err(e) => {
                tracing::error!("Crawl aborted: {}", e);
                RunOutcome::Aborted(e.to_string())
            }
        },
        _ = shutdown => {
            tracing::warn!(
                "Shutdown requested, keeping the {} posts collected so far",
                accumulator.len()
            );
            RunOutcome::Interrupted
        }
    }
}
