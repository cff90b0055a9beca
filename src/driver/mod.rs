//! Page drivers
//!
//! The crawl and the extractor never talk to a browser directly. They go
//! through [`PageDriver`] (one loaded page at a time) and [`ElementHandle`]
//! (one element on it). Two drivers are provided:
//!
//! - [`ChromeDriver`]: headless Chrome over the DevTools protocol, for the
//!   client-rendered live site
//! - [`StaticDriver`]: plain HTTP fetch answered from the parsed HTML, for
//!   server-rendered mirrors, saved snapshots and tests

mod chrome;
mod snapshot;

pub use chrome::ChromeDriver;
pub use snapshot::{build_http_client, StaticDriver, StaticElement};

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Interval between polls while waiting for elements to appear
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Errors raised by page drivers
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Query '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    #[error("No element matched '{0}'")]
    NotFound(String),

    #[error("Timed out after {timeout_ms}ms waiting for '{selector}'")]
    Timeout { selector: String, timeout_ms: u128 },

    #[error("Script evaluation failed: {0}")]
    Script(String),

    #[error("Element read failed: {0}")]
    Element(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("No page has been loaded")]
    NoPage,
}

impl DriverError {
    /// Returns true when the error means "nothing showed up in time"
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for driver operations
pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Element lookup relative to an element
///
/// Tag names are lowercase HTML tag names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativePath<'a> {
    /// Direct children with the given tag
    Child(&'a str),
    /// All direct element children
    Children,
    /// Descendants at any depth with the given tag
    Descendant(&'a str),
}

impl RelativePath<'_> {
    /// CSS selector equivalent, evaluated with the element as `:scope`
    pub fn to_css(&self) -> String {
        match self {
            Self::Child(tag) => format!(":scope > {}", tag),
            Self::Children => ":scope > *".to_string(),
            Self::Descendant(tag) => tag.to_string(),
        }
    }
}

/// One piece of an element's mixed content
#[derive(Debug, Clone)]
pub enum InlineSegment<E> {
    /// A text node, whitespace as rendered
    Text(String),
    /// An element child
    Element(E),
}

/// One element on the loaded page
#[async_trait]
pub trait ElementHandle: Send + Sync + Sized {
    /// Lowercase tag name (`img`, `p`, `span`, ...)
    async fn tag_kind(&self) -> DriverResult<String>;

    /// Rendered text of the element and its descendants
    async fn text(&self) -> DriverResult<String>;

    /// Attribute value; `href` and `src` come back resolved to absolute URLs
    async fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    /// All elements at `path`, in document order
    async fn locate_all(&self, path: RelativePath<'_>) -> DriverResult<Vec<Self>>;

    /// Direct children, text nodes included, in document order
    async fn inline_segments(&self) -> DriverResult<Vec<InlineSegment<Self>>>;

    /// The `class` attribute, empty when absent
    async fn class_signature(&self) -> DriverResult<String> {
        Ok(self.attribute("class").await?.unwrap_or_default())
    }

    /// First element at `path`, or `None` when there is none
    async fn find_optional(&self, path: RelativePath<'_>) -> DriverResult<Option<Self>> {
        Ok(self.locate_all(path).await?.into_iter().next())
    }

    /// First element at `path`; absence is an error
    async fn locate_child(&self, path: RelativePath<'_>) -> DriverResult<Self> {
        self.find_optional(path)
            .await?
            .ok_or_else(|| DriverError::NotFound(path.to_css()))
    }
}

/// A browser-like session holding one loaded page
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Element: ElementHandle;

    /// Loads `url`, replacing the current page
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// All elements matching a CSS selector (unions allowed), in document order
    async fn locate(&self, selector: &str) -> DriverResult<Vec<Self::Element>>;

    /// Evaluates a JavaScript expression and returns its value (`Null` when none)
    async fn run_script(&self, code: &str) -> DriverResult<serde_json::Value>;

    /// First element matching `selector`; absence is an error
    async fn locate_one(&self, selector: &str) -> DriverResult<Self::Element> {
        self.locate(selector)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DriverError::NotFound(selector.to_string()))
    }

    /// Polls until `selector` matches at least one element or `timeout` passes
    async fn wait_for_elements(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> DriverResult<Vec<Self::Element>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let found = self.locate(selector).await?;
            if !found.is_empty() {
                return Ok(found);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis(),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    /// Sets `display: none` on every element matching `selector`
    async fn hide_elements(&self, selector: &str) -> DriverResult<()> {
        self.run_script(&hide_script(selector)).await?;
        Ok(())
    }

    /// Releases the session
    async fn close(&self) -> DriverResult<()> {
        Ok(())
    }
}

/// Builds the expression that hides every element matching `selector`
///
/// Kept as a plain expression (no arrow function) so drivers evaluate it
/// directly instead of treating it as a function declaration.
pub fn hide_script(selector: &str) -> String {
    format!(
        "document.querySelectorAll('{}').forEach(function (el) {{ el.style.display = 'none'; }})",
        selector.replace('\\', "\\\\").replace('\'', "\\'")
    )
}
