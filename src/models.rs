//! Data models for channel targets and extracted videos.
//!
//! - [`ChannelTarget`]: a channel whose listing page is polled
//! - [`VideoRecord`]: a fresh video read from the listing and detail pages
//! - [`SkipReason`]: why a channel produced no record this run

use crate::browser::BrowserError;
use chrono::TimeDelta;
use std::fmt;
use url::Url;

/// A channel to check, identified by its canonical URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTarget {
    url: Url,
}

impl ChannelTarget {
    pub fn parse(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            url: Url::parse(url)?,
        })
    }

    /// The channel's grid of uploads: `{channel}/videos`.
    pub fn videos_url(&self) -> String {
        format!("{}/videos", self.url.as_str().trim_end_matches('/'))
    }
}

impl fmt::Display for ChannelTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// A video published inside the recency window.
///
/// Only built after the detail page was read, so `publisher` and
/// `description` are always real values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRecord {
    /// Channel name as shown on the watch page.
    pub publisher: String,
    /// Full title from the listing link's `title` attribute.
    pub title: String,
    /// Publish time exactly as the listing displayed it, e.g. `"45 minutes ago"`.
    pub published_text: String,
    /// Absolute watch page URL.
    pub detail_url: String,
    /// Expanded description text.
    pub description: String,
}

/// Printed form: publisher and title, raw publish time, then the link.
impl fmt::Display for VideoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}\n{}\nLink: {}",
            self.publisher, self.title, self.published_text, self.detail_url
        )
    }
}

/// Why a channel check produced no [`VideoRecord`].
#[derive(Debug, thiserror::Error)]
pub enum SkipReason {
    #[error("latest video '{title}' is {} minutes old ({published_text})", .age.num_minutes())]
    Stale {
        title: String,
        published_text: String,
        age: TimeDelta,
    },

    #[error("could not parse publish time '{published_text}'")]
    UnparsableDate { published_text: String },

    #[error(transparent)]
    Browser(#[from] BrowserError),
}
