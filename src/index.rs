//! Sitemap index document built in memory and written once

use crate::config::SitemapConfig;
use crate::date::last_modified_date;
use crate::error::{Result, SitemapError};
use crate::output;
use crate::types::LastModified;
use crate::xml_writer::XmlWriter;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Builds a `<sitemapindex>` document listing sitemap files
///
/// Nothing is allocated until the first entry. [`finish`](Self::finish)
/// writes the whole document in one call, or does nothing if no entry was
/// ever added.
///
/// # Examples
///
/// ```no_run
/// use sitemapstream::SitemapIndexWriter;
///
/// let mut index = SitemapIndexWriter::new("public/sitemap_index.xml");
/// index.add_sitemap("https://example.com/sitemap.xml", None)?;
/// index.add_sitemap("https://example.com/sitemap-1.xml", Some(&"2024-03-01".into()))?;
/// index.finish()?;
/// # Ok::<(), sitemapstream::SitemapError>(())
/// ```
pub struct SitemapIndexWriter {
    path: PathBuf,
    config: SitemapConfig,
    writer: Option<XmlWriter<Vec<u8>>>,
    entries: usize,
}

impl SitemapIndexWriter {
    /// Create an index writer targeting `path` with default settings
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let config = SitemapConfig::default().with_index_path(path.as_ref());
        Self::with_config(config)
    }

    /// Create an index writer from a config; the target is `config.index_path`
    pub fn with_config(config: SitemapConfig) -> Self {
        SitemapIndexWriter {
            path: config.index_path.clone(),
            config,
            writer: None,
            entries: 0,
        }
    }

    /// Path the index is written to
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Change the target path. Takes effect at the next `finish`.
    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = path.as_ref().to_path_buf();
    }

    /// Entries added to the document currently being built
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Whether a document has been started and not yet written
    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }

    fn start(&self) -> Result<XmlWriter<Vec<u8>>> {
        let mut writer = XmlWriter::new(Vec::new());
        writer.set_indent(&self.config.indent);
        writer.start_document("1.0", "UTF-8")?;
        writer.start_element("sitemapindex")?;
        Ok(writer)
    }

    /// Append a `<sitemap>` entry. `location` is written as given; a missing
    /// `lastmod` is rendered as the current time.
    pub fn add_sitemap(&mut self, location: &str, lastmod: Option<&LastModified>) -> Result<()> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.start()?,
        };
        let writer = self.writer.insert(writer);

        writer.start_element("sitemap")?;
        writer.write_element("loc", location)?;
        writer.write_element("lastmod", &last_modified_date(lastmod))?;
        writer.end_element()?;
        self.entries += 1;
        Ok(())
    }

    /// Close the document and write it to [`path`](Self::path)
    ///
    /// Returns `false` without touching the filesystem if no entry was added.
    /// The in-memory document is consumed; a later `add_sitemap` starts a
    /// new one.
    pub fn finish(&mut self) -> Result<bool> {
        let Some(mut writer) = self.writer.take() else {
            return Ok(false);
        };
        let entries = std::mem::take(&mut self.entries);

        writer.end_document()?;
        let bytes = writer.into_inner()?;

        let mut file = output::create_file(&self.path, self.config.dir_mode)?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|source| SitemapError::Write {
                path: self.path.clone(),
                source,
            })?;
        drop(file);

        if let Some(mode) = self.config.file_mode {
            output::set_mode(&self.path, mode)?;
        }

        tracing::info!(
            path = %self.path.display(),
            entries,
            bytes = bytes.len(),
            "Wrote sitemap index"
        );
        Ok(true)
    }
}
