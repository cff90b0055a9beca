//! Bounded retry with linear backoff
//!
//! Browser interactions fail transiently (stale references, slow renders,
//! navigation timeouts). Every navigation, element query and element read in
//! the crawl goes through [`retry`]; in-memory logic never does.

use crate::config::RetryConfig;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// How many times to try and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (at least 1)
    pub attempts: u32,

    /// Delay unit; the wait after failed attempt `k` is `k * base_delay`
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// A single attempt with no waiting
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(config.attempts, Duration::from_millis(config.base_delay_ms))
    }
}

/// Runs `operation` until it succeeds or the policy's attempts are used up
///
/// Each failure except the last is logged with its attempt count and followed
/// by a linearly growing delay. The last failure is returned to the caller.
///
/// # Example
///
/// ```no_run
/// use pathloom_export::retry::{retry, RetryPolicy};
///
/// # async fn example() -> Result<(), std::io::Error> {
/// let policy = RetryPolicy::default();
/// let body = retry(&policy, "read page", || async {
///     tokio::fs::read_to_string("page.html").await
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.attempts => {
                tracing::debug!("{}: giving up after {} attempts", label, attempt);
                return Err(e);
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "{}: attempt {}/{} failed: {}. Retrying in {}ms...",
                    label,
                    attempt,
                    policy.attempts,
                    e,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
