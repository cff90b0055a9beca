//! pathloom-export: a blog-to-WordPress exporter
//!
//! This crate drives a browser over a blog's paginated listing, visits every
//! post, rebuilds each post's content as an ordered list of typed blocks and
//! writes the lot as one XML document ready for bulk import.

pub mod config;
pub mod crawler;
pub mod driver;
pub mod extract;
pub mod output;
pub mod retry;
pub mod state;

use thiserror::Error;

/// Main error type for exporter operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Driver error: {0}")]
    Driver(#[from] driver::DriverError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("Failed to read {field} from {url}: {source}")]
    Field {
        field: &'static str,
        url: String,
        source: driver::DriverError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for exporter operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{BlockKind, ContentBlock};
pub use state::{Post, RunAccumulator, RunOutcome};
