use crate::config::types::{Config, OutputConfig, PacingConfig, RetryConfig, SiteConfig};
use crate::extract::SiteSignatures;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_pacing_config(&config.pacing)?;
    validate_retry_config(&config.retry)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site section
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_http_url("listing-url", &config.listing_url)?;
    validate_http_url("post-base-url", &config.post_base_url)?;

    if config.start_page < 1 {
        return Err(ConfigError::Validation(
            "start-page must be >= 1, got 0".to_string(),
        ));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max-pages must be >= 1 when set".to_string(),
        ));
    }

    if SiteSignatures::for_version(&config.signature_version).is_none() {
        return Err(ConfigError::Validation(format!(
            "Unknown signature-version '{}' (known: {})",
            config.signature_version,
            SiteSignatures::known_versions().join(", ")
        )));
    }

    Ok(())
}

/// Validates pacing configuration
fn validate_pacing_config(config: &PacingConfig) -> Result<(), ConfigError> {
    if config.scroll_step_px == 0 {
        return Err(ConfigError::Validation(
            "scroll-step-px must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates retry configuration
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.attempts < 1 || config.attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "retry attempts must be between 1 and 10, got {}",
            config.attempts
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Checks that a URL parses and uses http or https
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
