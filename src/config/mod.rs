//! Configuration module for the exporter
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the exporter also runs without any file.
//!
//! # Example
//!
//! ```no_run
//! use pathloom_export::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("export.toml")).unwrap();
//! println!("Writing to: {}", config.output.path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, DedupScope, DriverKind, ExtractionConfig, OutputConfig, PacingConfig,
    RetryConfig, SiteConfig,
};

// Re-export parser functions
pub use parser::{config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
