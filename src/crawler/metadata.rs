//! Post metadata collection
//!
//! Author, title, date and tags are each read with their own retry. A field
//! that never reads fails the post it belongs to.

use crate::driver::{DriverError, ElementHandle, PageDriver};
use crate::extract::MetadataSelectors;
use crate::retry::{retry, RetryPolicy};
use crate::state::{collect_tags, PostMetadata};
use crate::{Result, ScrapeError};

/// Reads post metadata from the loaded page
pub struct MetadataCollector<'a> {
    selectors: &'a MetadataSelectors,
    retry: RetryPolicy,
}

impl<'a> MetadataCollector<'a> {
    pub fn new(selectors: &'a MetadataSelectors, retry: RetryPolicy) -> Self {
        Self { selectors, retry }
    }

    /// Collects every field of the post loaded at `url`
    pub async fn collect<D: PageDriver>(&self, driver: &D, url: &str) -> Result<PostMetadata> {
        let author = self.read_text(driver, "author", self.selectors.author, url).await?;
        let title = self.read_text(driver, "title", self.selectors.title, url).await?;
        let date = self.read_text(driver, "date", self.selectors.date, url).await?;
        let tags = self.read_tags(driver, url).await?;

        tracing::debug!("Metadata for {}: '{}' by {} ({})", url, title, author, date);

        Ok(PostMetadata {
            author,
            title,
            date,
            tags,
        })
    }

    async fn read_text<D: PageDriver>(
        &self,
        driver: &D,
        field: &'static str,
        selector: &str,
        url: &str,
    ) -> Result<String> {
        retry(&self.retry, field, move || async move {
            driver.locate_one(selector).await?.text().await
        })
        .await
        .map(|text| text.trim().to_string())
        .map_err(|source| ScrapeError::Field {
            field,
            url: url.to_string(),
            source,
        })
    }

    async fn read_tags<D: PageDriver>(&self, driver: &D, url: &str) -> Result<String> {
        let selector = self.selectors.tags;
        retry(&self.retry, "tags", move || async move {
            let mut raw = Vec::new();
            for element in driver.locate(selector).await? {
                raw.push(element.text().await?);
            }
            Ok::<_, DriverError>(collect_tags(raw))
        })
        .await
        .map_err(|source| ScrapeError::Field {
            field: "tags",
            url: url.to_string(),
            source,
        })
    }
}
