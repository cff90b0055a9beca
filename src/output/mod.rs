//! Output module for writing the import document
//!
//! This module handles:
//! - Rendering posts as WordPress block markup
//! - Serializing the run's posts into one XML document
//! - Writing that document to disk

mod xml;

pub use xml::{cdata_segments, render_content, render_document};

use crate::config::OutputConfig;
use crate::state::Post;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type alias for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes `posts` as one import document at `path`
pub fn write_document(posts: &[Post], path: &Path, image_caption: &str) -> OutputResult<()> {
    let document = render_document(posts, image_caption)?;

    let mut file = File::create(path)?;
    file.write_all(document.as_bytes())?;

    Ok(())
}

/// Flushes the run's posts to the configured file
///
/// Nothing is written when there are no posts.
///
/// # Arguments
///
/// * `posts` - Posts accumulated during the run
/// * `config` - Output configuration
///
/// # Returns
///
/// * `Ok(Some(n))` - `n` posts were written
/// * `Ok(None)` - There was nothing to write
/// * `Err(OutputError)` - The document could not be written
pub fn save_posts(posts: &[Post], config: &OutputConfig) -> OutputResult<Option<usize>> {
    if posts.is_empty() {
        tracing::info!("No blogs were fetched.");
        return Ok(None);
    }

    write_document(posts, Path::new(&config.path), &config.image_caption)?;
    tracing::info!("{} blogs have been saved to {}", posts.len(), config.path);
    Ok(Some(posts.len()))
}
