//! Post content extraction
//!
//! Turns a loaded post page into an ordered list of typed [`ContentBlock`]s.
//!
//! # Example
//!
//! ```no_run
//! use pathloom_export::driver::{PageDriver, StaticDriver};
//! use pathloom_export::extract::{ContentExtractor, DedupState, SiteSignatures};
//! use pathloom_export::retry::RetryPolicy;
//!
//! # async fn example() -> pathloom_export::Result<()> {
//! let driver = StaticDriver::new(&Default::default())?;
//! driver.navigate("https://www.pathloom.com/post/spring-garden").await?;
//!
//! let extractor = ContentExtractor::new(SiteSignatures::latest(), RetryPolicy::default());
//! let blocks = extractor.extract(&driver, &mut DedupState::new()).await;
//! println!("{} blocks", blocks.len());
//! # Ok(())
//! # }
//! ```

mod block;
mod content;
mod dedup;
mod filter;
mod signatures;

pub use block::{anchor_html, BlockKind, ContentBlock, HeadingLevel};
pub use content::{finalize, ContentExtractor};
pub use dedup::DedupState;
pub use filter::{is_blocked_image, IMAGE_BLOCKLIST, PROFILE_PICTURE_MARKER};
pub use signatures::{ListingSelectors, MetadataSelectors, Signature, SiteSignatures};
