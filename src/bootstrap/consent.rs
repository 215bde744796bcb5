//! One-time cookie consent dismissal.

use crate::browser::{Browser, BrowserError, Condition, PageElement};
use crate::config;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Load the site root and click "Accept all" if it shows up within `timeout`.
///
/// A missing button is normal (consent already stored, region without the
/// dialog, changed markup) and is only logged. Returns whether a click
/// happened.
#[instrument(level = "info", skip(browser))]
pub async fn dismiss_consent<B: Browser>(browser: &B, timeout: Duration) -> bool {
    match click_accept(browser, timeout).await {
        Ok(()) => {
            info!("Clicked the 'Accept all' consent button");
            true
        }
        Err(e) => {
            warn!(error = %e, "Consent button not found or not clickable, continuing");
            false
        }
    }
}

async fn click_accept<B: Browser>(browser: &B, timeout: Duration) -> Result<(), BrowserError> {
    browser.goto(config::CONSENT_URL).await?;
    browser
        .wait_for(&config::CONSENT_BUTTON, Condition::Clickable, timeout)
        .await?
        .click()
        .await
}
