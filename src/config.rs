//! Writer configuration with environment overrides

use crate::error::{Result, SitemapError};
use std::path::PathBuf;

/// Maximum number of `<url>` entries per sitemap file allowed by crawlers
pub const SITEMAP_ITEMS: usize = 50_000;

/// Default location of the sitemap index document
pub const DEFAULT_INDEX_PATH: &str = "sitemap_index.xml";

/// Default output file stem
pub const DEFAULT_OUTPUT_BASE: &str = "sitemap";

/// Mode applied to every output file and created directory by default
pub const DEFAULT_MODE: u32 = 0o777;

/// Settings shared by the sitemap and index writers
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SitemapConfig {
    /// Entries written before rotating to a new file
    pub items_per_file: usize,
    /// Where the index document is written
    pub index_path: PathBuf,
    /// Unix mode for output files; `None` keeps the OS default
    pub file_mode: Option<u32>,
    /// Unix mode for created directories; `None` keeps the OS default
    pub dir_mode: Option<u32>,
    /// String repeated once per nesting level
    pub indent: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        SitemapConfig {
            items_per_file: SITEMAP_ITEMS,
            index_path: PathBuf::from(DEFAULT_INDEX_PATH),
            file_mode: Some(DEFAULT_MODE),
            dir_mode: Some(DEFAULT_MODE),
            indent: "\t".to_string(),
        }
    }
}

impl SitemapConfig {
    /// Defaults overlaid with `SITEMAP_ITEMS_PER_FILE`, `SITEMAP_INDEX_PATH`
    /// and `SITEMAP_FILE_MODE`. Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = SitemapConfig::default();

        if let Some(items) = lookup("SITEMAP_ITEMS_PER_FILE")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
        {
            config.items_per_file = items;
        }

        if let Some(path) = lookup("SITEMAP_INDEX_PATH").filter(|s| !s.trim().is_empty()) {
            config.index_path = PathBuf::from(path);
        }

        if let Some(mode) = lookup("SITEMAP_FILE_MODE") {
            let mode = mode.trim();
            if mode.eq_ignore_ascii_case("none") {
                config.file_mode = None;
                config.dir_mode = None;
            } else if let Ok(parsed) = u32::from_str_radix(mode.trim_start_matches("0o"), 8) {
                config.file_mode = Some(parsed);
                config.dir_mode = Some(parsed);
            }
        }

        config
    }

    /// Set entries per file
    pub fn with_items_per_file(mut self, items: usize) -> Self {
        self.items_per_file = items;
        self
    }

    /// Set the index document path
    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = path.into();
        self
    }

    /// Set the file mode; `None` disables chmod on output files
    pub fn with_file_mode(mut self, mode: Option<u32>) -> Self {
        self.file_mode = mode;
        self
    }

    /// Set the directory mode; `None` disables chmod on created directories
    pub fn with_dir_mode(mut self, mode: Option<u32>) -> Self {
        self.dir_mode = mode;
        self
    }

    /// Set the indentation string
    pub fn with_indent(mut self, indent: &str) -> Self {
        self.indent = indent.to_string();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.items_per_file == 0 {
            return Err(SitemapError::InvalidConfig(
                "items_per_file must be at least 1".to_string(),
            ));
        }
        if self.index_path.as_os_str().is_empty() {
            return Err(SitemapError::InvalidConfig(
                "index_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
