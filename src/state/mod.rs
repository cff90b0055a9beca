//! Run state
//!
//! # Components
//!
//! - `Post`: one scraped blog entry, immutable once built
//! - `RunAccumulator`: the ordered list of posts for the run
//! - `RunOutcome` / `CrawlStats`: how the run ended and what it did

mod accumulator;
mod post;
mod run_state;

pub use accumulator::RunAccumulator;
pub use post::{collect_tags, derive_slug, Post, PostMetadata};
pub use run_state::{CrawlStats, RunOutcome};
