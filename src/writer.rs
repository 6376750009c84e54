//! Streaming sitemap writer with automatic file rotation
//!
//! `<url>` entries are written straight to disk as they are added. Once
//! `items_per_file` entries have been written the current file is closed and
//! the next one is opened with a numeric suffix: `sitemap.xml`,
//! `sitemap-1.xml`, `sitemap-2.xml`, ...

use crate::config::{SitemapConfig, DEFAULT_OUTPUT_BASE};
use crate::date::last_modified_date;
use crate::error::Result;
use crate::index::SitemapIndexWriter;
use crate::output;
use crate::types::{LastModified, UrlEntry};
use crate::xml_writer::XmlWriter;
use std::fs::File;
use std::path::{Path, PathBuf};

const SITEMAP_SEPARATOR: char = '-';
const SITEMAP_EXT: &str = ".xml";

/// One open `<urlset>` file
struct UrlsetFile {
    path: PathBuf,
    xml: XmlWriter<File>,
    items: usize,
}

impl UrlsetFile {
    fn create(path: PathBuf, config: &SitemapConfig) -> Result<Self> {
        let file = output::create_file(&path, config.dir_mode)?;
        let mut xml = XmlWriter::with_capacity(file, 64 * 1024);
        xml.set_indent(&config.indent);
        xml.start_document("1.0", "UTF-8")
            .and_then(|_| xml.start_element("urlset"))
            .map_err(|e| e.with_path(&path))?;
        if let Some(mode) = config.file_mode {
            output::set_mode(&path, mode)?;
        }
        tracing::info!(path = %path.display(), "Opened sitemap file");
        Ok(UrlsetFile {
            path,
            xml,
            items: 0,
        })
    }

    fn write_url(&mut self, loc: &str, entry: &UrlEntry) -> Result<()> {
        let xml = &mut self.xml;
        xml.start_element("url")?;
        xml.write_element("loc", loc)?;
        xml.write_element("priority", &entry.priority)?;
        if let Some(changefreq) = entry.changefreq.as_deref().filter(|s| !s.is_empty()) {
            xml.write_element("changefreq", changefreq)?;
        }
        if let Some(lastmod) = entry.lastmod.as_ref().filter(|l| !l.is_empty()) {
            xml.write_element("lastmod", &last_modified_date(Some(lastmod)))?;
        }
        xml.end_element()?;
        self.items += 1;
        Ok(())
    }

    fn finish(mut self) -> Result<PathBuf> {
        self.xml
            .end_document()
            .and_then(|_| self.xml.flush())
            .map_err(|e| e.with_path(&self.path))?;
        tracing::info!(path = %self.path.display(), items = self.items, "Finished sitemap file");
        Ok(self.path)
    }
}

/// Sitemap writer with TRUE streaming and file rotation
///
/// Files are opened lazily on the first [`add_item`](Self::add_item) and
/// must be closed with [`end_sitemap`](Self::end_sitemap). Dropping the
/// writer closes the file handle but leaves the document unterminated.
///
/// # Examples
///
/// ```no_run
/// use sitemapstream::{ChangeFrequency, SitemapWriter, UrlEntry};
///
/// let mut writer = SitemapWriter::new();
/// writer.set_domain("https://example.com/");
/// writer.set_output_base("public/sitemap")?;
///
/// writer
///     .add_item("about")?
///     .add_item(UrlEntry::new("blog").with_priority(0.8).with_changefreq(ChangeFrequency::Daily))?;
/// writer.end_sitemap()?;
///
/// for path in writer.sitemap_files().to_vec() {
///     let name = path.file_name().unwrap().to_string_lossy();
///     writer.add_index_sitemap(&format!("https://example.com/{name}"), None)?;
/// }
/// writer.end_index_sitemap()?;
/// # Ok::<(), sitemapstream::SitemapError>(())
/// ```
pub struct SitemapWriter {
    config: SitemapConfig,
    domain: String,
    output_base: String,
    item_count: u64,
    file_index: u64,
    files_opened: u64,
    current_file_path: Option<PathBuf>,
    active: Option<UrlsetFile>,
    files: Vec<PathBuf>,
    index: SitemapIndexWriter,
}

impl Default for SitemapWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapWriter {
    /// Create a writer with default settings, writing `sitemap.xml` in the
    /// working directory
    pub fn new() -> Self {
        SitemapWriter::from_parts(SitemapConfig::default())
    }

    /// Create a writer with the given settings
    pub fn with_config(config: SitemapConfig) -> Result<Self> {
        config.validate()?;
        Ok(SitemapWriter::from_parts(config))
    }

    fn from_parts(config: SitemapConfig) -> Self {
        SitemapWriter {
            index: SitemapIndexWriter::with_config(config.clone()),
            config,
            domain: String::new(),
            output_base: DEFAULT_OUTPUT_BASE.to_string(),
            item_count: 0,
            file_index: 0,
            files_opened: 0,
            current_file_path: None,
            active: None,
            files: Vec::new(),
        }
    }

    /// Start a [`SitemapWriterBuilder`]
    pub fn builder() -> SitemapWriterBuilder {
        SitemapWriterBuilder::new()
    }

    /// Set the base URL. One trailing slash is stripped; locations are joined
    /// to it with a single `/`.
    pub fn set_domain(&mut self, domain: &str) -> &mut Self {
        self.domain = domain.strip_suffix('/').unwrap_or(domain).to_string();
        self
    }

    /// Base URL with its separating slash
    pub fn domain(&self) -> String {
        format!("{}/", self.domain)
    }

    /// Set the output file stem (no extension). A missing parent directory
    /// is created immediately.
    pub fn set_output_base<P: AsRef<Path>>(&mut self, base: P) -> Result<&mut Self> {
        let base = base.as_ref();
        if let Some(parent) = base.parent() {
            output::ensure_dir(parent, self.config.dir_mode)?;
        }
        self.output_base = base.to_string_lossy().into_owned();
        Ok(self)
    }

    /// Output file stem
    pub fn output_base(&self) -> &str {
        &self.output_base
    }

    /// Set where the index document is written
    pub fn set_index_path<P: AsRef<Path>>(&mut self, path: P) -> &mut Self {
        self.index.set_path(path);
        self
    }

    /// Path of the index document
    pub fn index_path(&self) -> &Path {
        self.index.path()
    }

    /// Path of the most recently opened sitemap file
    pub fn current_file_path(&self) -> Option<&Path> {
        self.current_file_path.as_deref()
    }

    /// Every sitemap file opened so far, in order
    pub fn sitemap_files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Total entries written across all files
    pub fn item_count(&self) -> u64 {
        self.item_count
    }

    /// Whether a sitemap file is currently open
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn config(&self) -> &SitemapConfig {
        &self.config
    }

    fn next_file_path(&mut self) -> PathBuf {
        if self.files_opened > 0 {
            self.file_index += 1;
        }
        self.files_opened += 1;

        let mut name = self.output_base.clone();
        if self.file_index > 0 {
            let mut buf = itoa::Buffer::new();
            name.push(SITEMAP_SEPARATOR);
            name.push_str(buf.format(self.file_index));
        }
        name.push_str(SITEMAP_EXT);

        let path = PathBuf::from(name);
        self.current_file_path = Some(path.clone());
        path
    }

    fn start_sitemap(&mut self) -> Result<()> {
        let path = self.next_file_path();
        let file = UrlsetFile::create(path.clone(), &self.config)?;
        self.files.push(path);
        self.active = Some(file);
        Ok(())
    }

    fn close_active(&mut self) -> Result<()> {
        if let Some(file) = self.active.take() {
            file.finish()?;
        }
        Ok(())
    }

    fn needs_rotation(&self) -> bool {
        self.active.is_none() || self.item_count % self.config.items_per_file as u64 == 0
    }

    /// Write one `<url>` entry, rotating to a new file first when the
    /// per-file limit has been reached
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sitemapstream::{SitemapWriter, UrlEntry};
    ///
    /// let mut writer = SitemapWriter::new();
    /// writer.set_domain("http://example.com/");
    /// writer.add_item("page1")?;
    /// writer.add_item(UrlEntry::new("page2").with_lastmod(1_700_000_000i64))?;
    /// writer.end_sitemap()?;
    /// # Ok::<(), sitemapstream::SitemapError>(())
    /// ```
    pub fn add_item(&mut self, entry: impl Into<UrlEntry>) -> Result<&mut Self> {
        let entry = entry.into();

        if self.needs_rotation() {
            if self.active.is_some() {
                tracing::debug!(items = self.item_count, "Sitemap file full, rotating");
            }
            self.close_active()?;
            self.start_sitemap()?;
        }

        let loc = format!("{}/{}", self.domain, entry.location);
        if let Some(file) = self.active.as_mut() {
            if let Err(e) = file.write_url(&loc, &entry) {
                let path = file.path.clone();
                self.active = None;
                return Err(e.with_path(&path));
            }
            self.item_count += 1;
        }
        Ok(self)
    }

    /// Add many entries in order
    pub fn add_items<I, E>(&mut self, entries: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<UrlEntry>,
    {
        for entry in entries {
            self.add_item(entry)?;
        }
        Ok(self)
    }

    /// Close the current sitemap file
    ///
    /// If no file is open one is created first, so an empty but well-formed
    /// `<urlset></urlset>` document always exists afterwards.
    ///
    /// The item count is not reset. The next `add_item` opens the next
    /// suffixed file, and that file only holds entries up to the next
    /// multiple of `items_per_file` in the total count: with a limit of 10,
    /// writing 3 entries, ending, then writing 10 more gives files of 3, 7
    /// and 3 entries.
    pub fn end_sitemap(&mut self) -> Result<()> {
        if self.active.is_none() {
            self.start_sitemap()?;
        }
        self.close_active()
    }

    /// Append an entry to the index document. `location` is an absolute URL
    /// and is not prefixed with the domain.
    pub fn add_index_sitemap(
        &mut self,
        location: &str,
        lastmod: Option<&LastModified>,
    ) -> Result<()> {
        self.index.add_sitemap(location, lastmod)
    }

    /// Write the index document. Does nothing if no entry was added.
    pub fn end_index_sitemap(&mut self) -> Result<()> {
        self.index.finish()?;
        Ok(())
    }
}

impl Drop for SitemapWriter {
    fn drop(&mut self) {
        if let Some(file) = &self.active {
            tracing::debug!(
                path = %file.path.display(),
                "Sitemap writer dropped with an unfinished file"
            );
        }
    }
}

/// Builder for creating configured sitemap writers
pub struct SitemapWriterBuilder {
    config: SitemapConfig,
    domain: Option<String>,
    output_base: Option<PathBuf>,
}

impl Default for SitemapWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapWriterBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        SitemapWriterBuilder {
            config: SitemapConfig::default(),
            domain: None,
            output_base: None,
        }
    }

    /// Replace all settings
    pub fn with_config(mut self, config: SitemapConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the base URL
    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = Some(domain.to_string());
        self
    }

    /// Set the output file stem
    pub fn with_output_base<P: AsRef<Path>>(mut self, base: P) -> Self {
        self.output_base = Some(base.as_ref().to_path_buf());
        self
    }

    /// Set entries per file
    pub fn with_items_per_file(mut self, items: usize) -> Self {
        self.config.items_per_file = items;
        self
    }

    /// Set the index document path
    pub fn with_index_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.index_path = path.as_ref().to_path_buf();
        self
    }

    /// Set the mode for output files and created directories
    pub fn with_mode(mut self, mode: Option<u32>) -> Self {
        self.config.file_mode = mode;
        self.config.dir_mode = mode;
        self
    }

    /// Build the writer, creating the output directory if needed
    pub fn build(self) -> Result<SitemapWriter> {
        let mut writer = SitemapWriter::with_config(self.config)?;
        if let Some(domain) = &self.domain {
            writer.set_domain(domain);
        }
        if let Some(base) = &self.output_base {
            writer.set_output_base(base)?;
        }
        Ok(writer)
    }
}
