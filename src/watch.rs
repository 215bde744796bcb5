//! Runs the extractor over every configured channel.
//!
//! Channels are checked one after another and independently: whatever
//! happens to one has no influence on whether the next is attempted. Each
//! skip is logged here with its reason.

use crate::browser::Browser;
use crate::extractor::check_channel;
use crate::models::{ChannelTarget, SkipReason, VideoRecord};
use crate::utils::truncate_for_log;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

/// Check each target in order and collect the fresh videos.
///
/// `clock` is consulted once per target.
#[instrument(level = "info", skip_all, fields(targets = targets.len()))]
pub async fn check_all<B, C>(browser: &B, targets: &[ChannelTarget], clock: C) -> Vec<VideoRecord>
where
    B: Browser,
    C: Fn() -> DateTime<Utc>,
{
    let mut records = Vec::new();

    for target in targets {
        match check_channel(browser, target, clock()).await {
            Ok(record) => {
                info!(
                    channel = %target,
                    publisher = %record.publisher,
                    title = %record.title,
                    description = %truncate_for_log(&record.description, 2000),
                    "Fresh video extracted"
                );
                records.push(record);
            }
            Err(reason) => log_skip(target, &reason),
        }
    }

    info!(found = records.len(), "Finished checking channels");
    records
}

fn log_skip(target: &ChannelTarget, reason: &SkipReason) {
    match reason {
        SkipReason::Stale { .. } => {
            info!(channel = %target, %reason, "Latest video is older than the window; skipping page load")
        }
        SkipReason::UnparsableDate { .. } => {
            warn!(channel = %target, %reason, "Could not parse publish time")
        }
        SkipReason::Browser(e) => {
            error!(channel = %target, error = %e, details = ?e, "An error occurred while processing channel")
        }
    }
}
