//! Type definitions for sitemap entries

use chrono::{DateTime, Utc};
use std::fmt;

/// Priority written when the caller does not give one
pub const DEFAULT_PRIORITY: &str = "0.5";

/// Change-frequency hint values recognised by crawlers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Get the value as written in `<changefreq>`
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ChangeFrequency> for String {
    fn from(freq: ChangeFrequency) -> Self {
        freq.as_str().to_string()
    }
}

/// Last-modified value for a URL or sitemap index entry
///
/// Rendered as `YYYY-MM-DD HH:MM:SS` in UTC by
/// [`last_modified_date`](crate::date::last_modified_date).
#[derive(Debug, Clone, PartialEq)]
pub enum LastModified {
    /// Current wall-clock time at the moment of writing
    Now,
    /// Seconds since the Unix epoch
    Timestamp(i64),
    /// Free-form date/time expression
    Text(String),
    /// Already-parsed instant
    DateTime(DateTime<Utc>),
}

impl LastModified {
    /// Classify a string: all digits is a Unix timestamp, anything else is
    /// free-form text.
    pub fn parse(value: &str) -> Self {
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(secs) = value.parse::<i64>() {
                return LastModified::Timestamp(secs);
            }
        }
        LastModified::Text(value.to_string())
    }

    /// Empty text carries no date and is skipped in `<url>` entries
    pub fn is_empty(&self) -> bool {
        matches!(self, LastModified::Text(s) if s.is_empty())
    }
}

impl From<&str> for LastModified {
    fn from(value: &str) -> Self {
        LastModified::parse(value)
    }
}

impl From<String> for LastModified {
    fn from(value: String) -> Self {
        LastModified::parse(&value)
    }
}

impl From<i64> for LastModified {
    fn from(secs: i64) -> Self {
        LastModified::Timestamp(secs)
    }
}

impl From<DateTime<Utc>> for LastModified {
    fn from(dt: DateTime<Utc>) -> Self {
        LastModified::DateTime(dt)
    }
}

/// A single `<url>` entry
///
/// # Examples
///
/// ```
/// use sitemapstream::types::{ChangeFrequency, UrlEntry};
///
/// let entry = UrlEntry::new("blog/post-1")
///     .with_priority(0.8)
///     .with_changefreq(ChangeFrequency::Weekly)
///     .with_lastmod(1_700_000_000i64);
///
/// assert_eq!(entry.priority, "0.8");
/// assert_eq!(entry.changefreq.as_deref(), Some("weekly"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UrlEntry {
    /// Path relative to the writer's domain
    pub location: String,
    /// Priority exactly as it will be written
    pub priority: String,
    /// Change frequency, passed through unvalidated
    pub changefreq: Option<String>,
    /// Last modification date
    #[cfg_attr(feature = "serde", serde(skip))]
    pub lastmod: Option<LastModified>,
}

impl UrlEntry {
    /// Create an entry with the default priority and no optional hints
    pub fn new(location: impl Into<String>) -> Self {
        UrlEntry {
            location: location.into(),
            priority: DEFAULT_PRIORITY.to_string(),
            changefreq: None,
            lastmod: None,
        }
    }

    /// Set the priority; any displayable value is written verbatim
    pub fn with_priority(mut self, priority: impl fmt::Display) -> Self {
        self.priority = priority.to_string();
        self
    }

    /// Set the change frequency
    pub fn with_changefreq(mut self, changefreq: impl Into<String>) -> Self {
        self.changefreq = Some(changefreq.into());
        self
    }

    /// Set the last modification date
    pub fn with_lastmod(mut self, lastmod: impl Into<LastModified>) -> Self {
        self.lastmod = Some(lastmod.into());
        self
    }
}

impl From<&str> for UrlEntry {
    fn from(location: &str) -> Self {
        UrlEntry::new(location)
    }
}

impl From<String> for UrlEntry {
    fn from(location: String) -> Self {
        UrlEntry::new(location)
    }
}
