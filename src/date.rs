//! Normalization of last-modified values to `YYYY-MM-DD HH:MM:SS`
//!
//! All instants are rendered in UTC. Naive date strings are taken to be UTC.
//! Text that matches none of the known layouts renders as the Unix epoch.

use crate::types::LastModified;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Output layout for `<lastmod>`
pub const LASTMOD_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

/// Render a last-modified value, defaulting to the current time
pub fn last_modified_date(value: Option<&LastModified>) -> String {
    format_instant(resolve(value))
}

/// Resolve a last-modified value to an instant
pub fn resolve(value: Option<&LastModified>) -> DateTime<Utc> {
    match value {
        None | Some(LastModified::Now) => Utc::now(),
        Some(LastModified::Timestamp(secs)) => from_timestamp(*secs),
        Some(LastModified::DateTime(dt)) => *dt,
        Some(LastModified::Text(text)) => parse_text(text),
    }
}

/// Format an instant with [`LASTMOD_FORMAT`]
pub fn format_instant(instant: DateTime<Utc>) -> String {
    instant.format(LASTMOD_FORMAT).to_string()
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(|| {
        tracing::warn!(timestamp = secs, "Timestamp out of range, using epoch");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

fn parse_text(text: &str) -> DateTime<Utc> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("now") {
        return Utc::now();
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(secs) = text.parse::<i64>() {
            return from_timestamp(secs);
        }
    }

    parse_free_form(text).unwrap_or_else(|| {
        tracing::warn!(value = text, "Unparseable lastmod, using epoch");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

/// Parse a free-form date/time expression. Returns `None` when no known
/// layout matches.
pub fn parse_free_form(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
