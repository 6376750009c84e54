//! # sitemapstream
//!
//! A Rust library for streaming XML sitemap generation.
//!
//! ## Features
//!
//! - **Streaming Write**: `<url>` entries go straight to disk, memory stays flat
//! - **Automatic Rotation**: a new file every 50,000 entries (`sitemap.xml`,
//!   `sitemap-1.xml`, `sitemap-2.xml`, ...)
//! - **Sitemap Index**: build a `<sitemapindex>` listing every generated file
//! - **Date Normalization**: Unix timestamps and free-form dates rendered as
//!   `YYYY-MM-DD HH:MM:SS`
//! - **Better Errors**: every I/O failure carries the path it happened on
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sitemapstream::{ChangeFrequency, SitemapWriter, UrlEntry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut writer = SitemapWriter::builder()
//!     .with_domain("https://example.com")
//!     .with_output_base("public/sitemap")
//!     .with_index_path("public/sitemap_index.xml")
//!     .build()?;
//!
//! for id in 0..120_000 {
//!     writer.add_item(
//!         UrlEntry::new(format!("products/{id}"))
//!             .with_priority(0.6)
//!             .with_changefreq(ChangeFrequency::Weekly)
//!             .with_lastmod("2024-03-01"),
//!     )?;
//! }
//! writer.end_sitemap()?;
//!
//! for path in writer.sitemap_files().to_vec() {
//!     let name = path.file_name().unwrap().to_string_lossy();
//!     writer.add_index_sitemap(&format!("https://example.com/{name}"), None)?;
//! }
//! writer.end_index_sitemap()?;
//! # Ok(())
//! # }
//! ```
//!
//! Output documents carry no `xmlns` attribute on their root element.

pub mod config;
pub mod date;
pub mod error;
pub mod index;
mod output;
pub mod types;
pub mod writer;
pub mod xml_writer;

pub use config::SitemapConfig;
pub use error::{Result, SitemapError};
pub use index::SitemapIndexWriter;
pub use types::{ChangeFrequency, LastModified, UrlEntry};
pub use writer::{SitemapWriter, SitemapWriterBuilder};
