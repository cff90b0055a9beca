//! Delays and slow scrolling
//!
//! The live site renders lazily: images and gallery entries only appear once
//! they have been scrolled into view. Pages are therefore given time to settle
//! and then scrolled to the bottom in small steps.

use crate::config::PacingConfig;
use crate::driver::{DriverResult, PageDriver};
use std::time::Duration;

const PAGE_HEIGHT_SCRIPT: &str = "document.body.scrollHeight";

/// Sleeps for `ms` milliseconds; zero returns at once
pub async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Scrolls from the top to the page height measured before the first step
pub async fn scroll_to_bottom<D: PageDriver>(driver: &D, pacing: &PacingConfig) -> DriverResult<()> {
    let height = driver
        .run_script(PAGE_HEIGHT_SCRIPT)
        .await?
        .as_f64()
        .map(|h| h.max(0.0) as u64)
        .unwrap_or(0);
    let step = pacing.scroll_step_px.max(1);

    let mut position = 0;
    while position < height {
        driver
            .run_script(&format!("window.scrollTo(0, {})", position))
            .await?;
        position += step;
        pause(pacing.scroll_step_delay_ms).await;
    }

    tracing::trace!("Scrolled {}px", height);
    Ok(())
}
