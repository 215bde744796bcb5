//! Compiled-in configuration.
//!
//! Nothing here is read from the environment or a file: the channel list,
//! the recency window, every wait timeout and every page selector are fixed
//! at build time. Selectors track the current channel/watch page layout and
//! are the first thing to revisit when extraction starts failing.

use crate::browser::Locator;
use chrono::TimeDelta;
use std::time::Duration;

/// Channels checked on every run, in order.
pub const CHANNELS: &[&str] = &[
    "https://www.youtube.com/@mrbeast",
    "https://www.youtube.com/@linustechtips",
];

/// Items strictly younger than this are reported.
pub fn recency_window() -> TimeDelta {
    TimeDelta::hours(1)
}

/// Upper bound for the consent button to become clickable.
pub const CONSENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for any single listing or detail page element wait.
pub const PAGE_TIMEOUT: Duration = Duration::from_secs(20);

/// Upper bound for a freshly spawned driver to accept connections.
pub const DRIVER_START_TIMEOUT: Duration = Duration::from_secs(10);

/// Language the browser asks pages for. Relative publish times are only
/// understood in English.
pub const BROWSER_LOCALE: &str = "en-US";

/// Page visited once to dismiss the consent interstitial.
pub const CONSENT_URL: &str = "https://www.youtube.com";

/// Affirmative consent control.
pub const CONSENT_BUTTON: Locator =
    Locator::XPath(r#"//button[.//span[contains(text(), "Accept all")]]"#);

// Listing page (`{channel}/videos`).
pub const GRID_ITEM: Locator = Locator::Css("ytd-rich-grid-media");
pub const TITLE_LINK: Locator = Locator::Id("video-title-link");
pub const METADATA_LINE: Locator = Locator::Id("metadata-line");
pub const METADATA_SPAN: Locator = Locator::Tag("span");

// Detail page.
pub const CHANNEL_NAME: Locator = Locator::Css("ytd-channel-name #text");
pub const DESCRIPTION_EXPAND: Locator = Locator::Id("expand");
pub const DESCRIPTION: Locator = Locator::Id("description-inline-expander");

/// Written (truncated) when `--verbose` is given.
pub const LOG_FILE: &str = "output.log";

/// Pinned geckodriver release used for provisioning.
pub const GECKODRIVER_VERSION: &str = "v0.36.0";
pub const GECKODRIVER_RELEASES: &str = "https://github.com/mozilla/geckodriver/releases/download";
