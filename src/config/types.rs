use serde::Deserialize;

/// Main configuration structure for the exporter
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// configuration that scrapes the live blog with Chrome and writes `blogs.xml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
    pub retry: RetryConfig,
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

/// Which blog to scrape and how far
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL of the paginated listing; pages live at `{listing-url}/page/{n}`
    #[serde(rename = "listing-url")]
    pub listing_url: String,

    /// Prefix stripped from post links to form the slug
    #[serde(rename = "post-base-url")]
    pub post_base_url: String,

    /// First listing page to visit
    #[serde(rename = "start-page")]
    pub start_page: u32,

    /// Stop after this many listing pages
    #[serde(rename = "max-pages")]
    pub max_pages: Option<u32>,

    /// Version of the class-signature table matching the site's editor output
    #[serde(rename = "signature-version")]
    pub signature_version: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            listing_url: "https://www.pathloom.com/all-blogs".to_string(),
            post_base_url: "https://www.pathloom.com/post/".to_string(),
            start_page: 1,
            max_pages: None,
            signature_version: "v2".to_string(),
        }
    }
}

/// Page driver selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Headless Chrome over the DevTools protocol
    Chrome,
    /// Plain HTTP fetch, queried as static HTML
    Static,
}

/// Browser/driver configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub driver: DriverKind,

    /// Run Chrome without a window
    pub headless: bool,

    /// Chrome binary to launch instead of the auto-detected one
    #[serde(rename = "chrome-executable")]
    pub chrome_executable: Option<String>,

    /// User agent sent by the static driver
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout for the static driver (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            driver: DriverKind::Chrome,
            headless: true,
            chrome_executable: None,
            user_agent: concat!("pathloom-export/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Delays that give client-side rendering time to catch up
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Wait after a listing page loads, before scrolling (milliseconds)
    #[serde(rename = "listing-settle-ms")]
    pub listing_settle_ms: u64,

    /// Wait before navigating to a post (milliseconds)
    #[serde(rename = "before-post-ms")]
    pub before_post_ms: u64,

    /// Wait after a post loads, before scrolling (milliseconds)
    #[serde(rename = "post-settle-ms")]
    pub post_settle_ms: u64,

    /// Pixels per scroll step
    #[serde(rename = "scroll-step-px")]
    pub scroll_step_px: u64,

    /// Delay between scroll steps (milliseconds)
    #[serde(rename = "scroll-step-delay-ms")]
    pub scroll_step_delay_ms: u64,

    /// How long to wait for post links on a listing page (milliseconds)
    #[serde(rename = "wait-timeout-ms")]
    pub wait_timeout_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            listing_settle_ms: 1500,
            before_post_ms: 3000,
            post_settle_ms: 3000,
            scroll_step_px: 100,
            scroll_step_delay_ms: 35,
            wait_timeout_ms: 10_000,
        }
    }
}

/// Bounded retry with linear backoff
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts, including the first
    pub attempts: u32,

    /// Delay unit; attempt `k` waits `k * base-delay-ms` before retrying
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 4,
            base_delay_ms: 1200,
        }
    }
}

/// Boundary within which repeated text and links are suppressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupScope {
    #[default]
    Post,
    Run,
}

/// Content extraction settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    #[serde(rename = "dedup-scope")]
    pub dedup_scope: DedupScope,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the XML document to write
    pub path: String,

    /// Caption placed under every image
    #[serde(rename = "image-caption")]
    pub image_caption: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "blogs.xml".to_string(),
            image_caption: "Photo Credit: Jordan".to_string(),
        }
    }
}
