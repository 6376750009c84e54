//! Error types for the sitemapstream library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for sitemap operations
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Main error type for all sitemap operations
#[derive(Error, Debug)]
pub enum SitemapError {
    /// Output directory could not be created
    #[error("Failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sitemap or index file could not be created
    #[error("Failed to create file '{}': {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Permissions could not be applied to an output file or directory
    #[error("Failed to set permissions on '{}': {source}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error occurred while writing to an output file
    #[error("Failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid writer configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SitemapError {
    /// Attach a path to a bare write error.
    pub(crate) fn with_path(self, path: &std::path::Path) -> Self {
        match self {
            SitemapError::Io(source) => SitemapError::Write {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
