//! Run outcome and counters

use std::fmt;

/// Counters for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub pages_visited: u32,
    pub links_seen: u32,
    pub posts_saved: u32,
    pub posts_failed: u32,
    pub links_skipped: u32,
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pages, {} links, {} saved, {} failed, {} skipped",
            self.pages_visited, self.links_seen, self.posts_saved, self.posts_failed, self.links_skipped
        )
    }
}

/// How a run ended; every outcome is followed by a flush
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No more listing pages
    Completed(CrawlStats),
    /// A shutdown signal arrived
    Interrupted,
    /// A listing-level step failed after its retries
    Aborted(String),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed(stats) => write!(f, "completed ({})", stats),
            Self::Interrupted => write!(f, "interrupted"),
            Self::Aborted(reason) => write!(f, "aborted: {}", reason),
        }
    }
}
