//! Human publish-time parsing.
//!
//! Listing pages show publish times the way a person would say them:
//! `"3 hours ago"`, `"Streamed live 2 days ago"`, `"Premiered on Jan 5, 2024"`.
//! Relative phrases are resolved against a caller-supplied `now` so the
//! extractor can compare against the same instant; absolute dates are handed
//! to `dateparser` and read as UTC.

use chrono::{DateTime, Months, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Broadcast/premiere wording in front of the actual time.
static LEAD_IN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:streamed live on|streamed live|streamed|premiered on|premiered|published on|uploaded)\s+")
        .unwrap()
});

/// `<count> <unit>[s] ago`
static RELATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(\d+|an?|one)\s+(seconds?|secs?|minutes?|mins?|hours?|hrs?|days?|weeks?|months?|years?)\s+ago$",
    )
    .unwrap()
});

/// Resolve a listing's publish-time text to an instant.
///
/// Returns `None` when the text is not understood; callers must not
/// substitute a default.
///
/// # Examples
///
/// ```ignore
/// let now = Utc::now();
/// assert_eq!(parse_published("45 minutes ago", now), Some(now - TimeDelta::minutes(45)));
/// assert_eq!(parse_published("1.2M views", now), None);
/// ```
pub fn parse_published(text: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    let phrase = LEAD_IN.replace(trimmed, "");
    let phrase = phrase.trim();

    match phrase.to_lowercase().as_str() {
        "" => return None,
        "just now" | "now" | "today" => return Some(now),
        "yesterday" => return now.checked_sub_signed(TimeDelta::days(1)),
        _ => {}
    }

    if let Some(caps) = RELATIVE.captures(phrase) {
        return relative(&caps[1].to_lowercase(), &caps[2].to_lowercase(), now);
    }

    dateparser::parse_with_timezone(phrase, &Utc).ok()
}

fn relative(count: &str, unit: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let n: i64 = match count {
        "a" | "an" | "one" => 1,
        digits => digits.parse().ok()?,
    };

    if unit.starts_with("mo") {
        return now.checked_sub_months(Months::new(u32::try_from(n).ok()?));
    }
    if unit.starts_with('y') {
        return now.checked_sub_months(Months::new(u32::try_from(n.checked_mul(12)?).ok()?));
    }

    let delta = if unit.starts_with('s') {
        TimeDelta::try_seconds(n)?
    } else if unit.starts_with("mi") {
        TimeDelta::try_minutes(n)?
    } else if unit.starts_with('h') {
        TimeDelta::try_hours(n)?
    } else if unit.starts_with('d') {
        TimeDelta::try_days(n)?
    } else {
        TimeDelta::try_weeks(n)?
    };
    now.checked_sub_signed(delta)
}
