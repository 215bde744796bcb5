//! Recency-gated extraction for a single channel.
//!
//! The listing page is cheap: one navigation gives the latest video's title,
//! link and publish time. The watch page is not, so it is only loaded when the
//! publish time falls inside [`config::recency_window`].
//!
//! ```text
//! listing loaded ─► metadata parsed ─┬─► stale: SkipReason::Stale
//!                                    └─► fresh: detail loaded ─► VideoRecord
//! ```
//!
//! Any failing step ends the check with a [`SkipReason`]; nothing is retried
//! and a partially read record is never returned.

use crate::browser::{Browser, BrowserError, Condition, PageElement};
use crate::config;
use crate::dates::parse_published;
use crate::models::{ChannelTarget, SkipReason, VideoRecord};
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info, instrument};

/// Listing-page data for the newest video.
#[derive(Debug)]
struct ListingEntry {
    title: String,
    detail_url: String,
    published_text: String,
}

/// Whether a video of this age warrants loading its watch page.
///
/// Strict: an item exactly one window old is stale. Negative ages (clock
/// skew) count as fresh.
pub fn is_fresh(age: TimeDelta) -> bool {
    age < config::recency_window()
}

/// Check one channel for a video published inside the recency window.
///
/// `now` anchors both relative publish times and the age comparison.
#[instrument(level = "info", skip_all, fields(channel = %target))]
pub async fn check_channel<B: Browser>(
    browser: &B,
    target: &ChannelTarget,
    now: DateTime<Utc>,
) -> Result<VideoRecord, SkipReason> {
    let entry = read_listing(browser, target).await?;

    let Some(published) = parse_published(&entry.published_text, now) else {
        return Err(SkipReason::UnparsableDate {
            published_text: entry.published_text,
        });
    };

    let age = now - published;
    if !is_fresh(age) {
        return Err(SkipReason::Stale {
            title: entry.title,
            published_text: entry.published_text,
            age,
        });
    }

    info!(title = %entry.title, published = %entry.published_text, "Recent video found; loading watch page");
    let (publisher, description) = read_detail(browser, &entry.detail_url).await?;

    Ok(VideoRecord {
        publisher,
        title: entry.title,
        published_text: entry.published_text,
        detail_url: entry.detail_url,
        description,
    })
}

async fn read_listing<B: Browser>(
    browser: &B,
    target: &ChannelTarget,
) -> Result<ListingEntry, BrowserError> {
    let listing_url = target.videos_url();
    info!(url = %listing_url, "Checking channel");
    browser.goto(&listing_url).await?;

    let item = browser
        .wait_for(&config::GRID_ITEM, Condition::Present, config::PAGE_TIMEOUT)
        .await?;

    // The title attribute carries the untruncated title.
    let link = item.find(&config::TITLE_LINK).await?;
    let title = match link.attr("title").await? {
        Some(title) if !title.trim().is_empty() => title,
        _ => link.text().await?,
    };
    let detail_url = link
        .attr("href")
        .await?
        .filter(|href| !href.is_empty())
        .ok_or(BrowserError::MissingAttribute {
            locator: config::TITLE_LINK,
            attr: "href",
        })?;

    // First span is the view count, second the publish time.
    let spans = item
        .find(&config::METADATA_LINE)
        .await?
        .find_all(&config::METADATA_SPAN)
        .await?;
    let published_span = spans.get(1).ok_or_else(|| {
        BrowserError::ElementNotFound(format!(
            "{} #2 under {} (found {})",
            config::METADATA_SPAN,
            config::METADATA_LINE,
            spans.len()
        ))
    })?;
    let published_text = published_span.text().await?;

    debug!(%title, %detail_url, %published_text, "Read listing entry");
    Ok(ListingEntry {
        title,
        detail_url,
        published_text,
    })
}

async fn read_detail<B: Browser>(
    browser: &B,
    detail_url: &str,
) -> Result<(String, String), BrowserError> {
    browser.goto(detail_url).await?;

    let publisher = browser
        .wait_for(&config::CHANNEL_NAME, Condition::Visible, config::PAGE_TIMEOUT)
        .await?
        .text()
        .await?;

    browser
        .wait_for(
            &config::DESCRIPTION_EXPAND,
            Condition::Clickable,
            config::PAGE_TIMEOUT,
        )
        .await?
        .click()
        .await?;

    let description = browser
        .wait_for(&config::DESCRIPTION, Condition::Visible, config::PAGE_TIMEOUT)
        .await?
        .text()
        .await?;

    Ok((publisher, description))
}
