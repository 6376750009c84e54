//! Integration tests for sitemapstream

use quick_xml::events::Event;
use quick_xml::Reader;
use sitemapstream::{ChangeFrequency, SitemapWriter, UrlEntry};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Parsed `<url>` or `<sitemap>` entry: child element name -> text
type Entry = Vec<(String, String)>;

/// Parse a sitemap or index document into (root name, entries)
fn parse(path: &Path) -> (String, Vec<Entry>) {
    let xml = fs::read_to_string(path).unwrap();
    let mut reader = Reader::from_str(&xml);
    reader.config_mut().trim_text(true);

    let mut root = None;
    let mut stack: Vec<String> = Vec::new();
    let mut entries: Vec<Entry> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => {
                let name = String::from_utf8(e.name().as_ref().to_vec()).unwrap();
                if root.is_none() {
                    root = Some(name.clone());
                } else if stack.len() == 1 {
                    entries.push(Vec::new());
                }
                stack.push(name);
                text.clear();
            }
            Event::Text(t) => text.push_str(&t.unescape().unwrap()),
            Event::End(_) => {
                let name = stack.pop().unwrap();
                if stack.len() == 2 {
                    entries
                        .last_mut()
                        .unwrap()
                        .push((name, std::mem::take(&mut text)));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert!(stack.is_empty(), "unbalanced document");
    (root.unwrap(), entries)
}

fn field<'a>(entry: &'a Entry, name: &str) -> Option<&'a str> {
    entry
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn writer_in(dir: &TempDir, items_per_file: usize) -> SitemapWriter {
    SitemapWriter::builder()
        .with_domain("http://example.com/")
        .with_output_base(dir.path().join("sitemap"))
        .with_index_path(dir.path().join("sitemap_index.xml"))
        .with_items_per_file(items_per_file)
        .build()
        .unwrap()
}

#[test]
fn test_file_count_matches_ceiling() {
    for (k, per_file) in [(1usize, 3usize), (3, 3), (4, 3), (9, 3), (10, 3), (7, 1)] {
        let dir = TempDir::new().unwrap();
        let mut writer = writer_in(&dir, per_file);
        for i in 0..k {
            writer.add_item(format!("p{i}")).unwrap();
        }
        writer.end_sitemap().unwrap();

        let files = writer.sitemap_files().to_vec();
        assert_eq!(files.len(), k.div_ceil(per_file), "k={k} per_file={per_file}");

        let counts: Vec<usize> = files.iter().map(|p| parse(p).1.len()).collect();
        let (last, full) = counts.split_last().unwrap();
        assert!(full.iter().all(|c| *c == per_file));
        assert_eq!(full.iter().sum::<usize>() + last, k);
    }
}

#[test]
fn test_default_limit_rotates_at_fifty_thousand() {
    let dir = TempDir::new().unwrap();
    let mut writer = SitemapWriter::builder()
        .with_domain("http://example.com")
        .with_output_base(dir.path().join("sitemap"))
        .build()
        .unwrap();

    for i in 0..100_001 {
        writer.add_item(format!("p{i}")).unwrap();
    }
    writer.end_sitemap().unwrap();

    let files = writer.sitemap_files().to_vec();
    assert_eq!(files.len(), 3);
    assert_eq!(files[0], dir.path().join("sitemap.xml"));
    assert_eq!(files[1], dir.path().join("sitemap-1.xml"));
    assert_eq!(files[2], dir.path().join("sitemap-2.xml"));

    let counts: Vec<usize> = files.iter().map(|p| parse(p).1.len()).collect();
    assert_eq!(counts, [50_000, 50_000, 1]);

    let (_, last) = parse(&files[2]);
    assert_eq!(field(&last[0], "loc"), Some("http://example.com/p100000"));
}

#[test]
fn test_round_trip_structure() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 100);

    writer
        .add_item(
            UrlEntry::new("page1")
                .with_priority(1.0)
                .with_changefreq(ChangeFrequency::Monthly)
                .with_lastmod("1700000000"),
        )
        .unwrap()
        .add_item(UrlEntry::new("a&b").with_lastmod("2024-03-01T08:00:00Z"))
        .unwrap()
        .add_item(UrlEntry::new("c").with_changefreq("sometimes"))
        .unwrap();
    writer.end_sitemap().unwrap();

    let (root, entries) = parse(&dir.path().join("sitemap.xml"));
    assert_eq!(root, "urlset");
    assert_eq!(entries.len(), 3);

    assert_eq!(field(&entries[0], "loc"), Some("http://example.com/page1"));
    assert_eq!(field(&entries[0], "priority"), Some("1"));
    assert_eq!(field(&entries[0], "changefreq"), Some("monthly"));
    assert_eq!(field(&entries[0], "lastmod"), Some("2023-11-14 22:13:20"));

    assert_eq!(field(&entries[1], "loc"), Some("http://example.com/a&b"));
    assert_eq!(field(&entries[1], "lastmod"), Some("2024-03-01 08:00:00"));
    assert_eq!(field(&entries[1], "changefreq"), None);

    assert_eq!(field(&entries[2], "changefreq"), Some("sometimes"));
    assert_eq!(field(&entries[2], "lastmod"), None);
}

#[test]
fn test_empty_sitemap_is_well_formed() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 10);
    writer.end_sitemap().unwrap();

    let path = dir.path().join("sitemap.xml");
    let xml = fs::read_to_string(&path).unwrap();
    assert!(xml.contains("<urlset></urlset>"));

    let (root, entries) = parse(&path);
    assert_eq!(root, "urlset");
    assert!(entries.is_empty());
}

#[test]
fn test_index_not_written_without_entries() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 10);
    writer.end_index_sitemap().unwrap();
    assert!(!dir.path().join("sitemap_index.xml").exists());
}

#[test]
fn test_index_lists_generated_files() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 2);
    writer.add_items(["a", "b", "c"]).unwrap();
    writer.end_sitemap().unwrap();

    for path in writer.sitemap_files().to_vec() {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        writer
            .add_index_sitemap(
                &format!("http://example.com/{name}"),
                Some(&"2024-03-01".into()),
            )
            .unwrap();
    }
    writer.end_index_sitemap().unwrap();

    let (root, entries) = parse(&dir.path().join("sitemap_index.xml"));
    assert_eq!(root, "sitemapindex");
    assert_eq!(entries.len(), 2);
    assert_eq!(
        field(&entries[0], "loc"),
        Some("http://example.com/sitemap.xml")
    );
    assert_eq!(
        field(&entries[1], "loc"),
        Some("http://example.com/sitemap-1.xml")
    );
    assert!(entries
        .iter()
        .all(|e| field(e, "lastmod") == Some("2024-03-01 00:00:00")));
}

#[test]
fn test_single_entry_index() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 10);
    writer
        .add_index_sitemap("http://example.com/sitemap.xml", None)
        .unwrap();
    writer.end_index_sitemap().unwrap();

    let (root, entries) = parse(writer.index_path());
    assert_eq!(root, "sitemapindex");
    assert_eq!(entries.len(), 1);
    assert_eq!(
        field(&entries[0], "loc"),
        Some("http://example.com/sitemap.xml")
    );
    assert_eq!(field(&entries[0], "lastmod").map(str::len), Some(19));
}

#[cfg(unix)]
#[test]
fn test_output_is_world_writable_by_default() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 10);
    writer.add_item("a").unwrap();
    writer.end_sitemap().unwrap();

    let mode = fs::metadata(dir.path().join("sitemap.xml"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o777);
}

#[test]
fn test_control_characters_stay_well_formed() {
    let dir = TempDir::new().unwrap();
    let mut writer = writer_in(&dir, 10);
    writer
        .add_item("a\u{1}b")
        .unwrap()
        .add_item(UrlEntry::new("line\rfeed").with_changefreq("da\u{0}ily"))
        .unwrap();
    writer.end_sitemap().unwrap();

    let path = dir.path().join("sitemap.xml");
    let bytes = fs::read(&path).unwrap();
    assert!(!bytes.iter().any(|b| *b < 0x20 && !matches!(b, b'\t' | b'\n')));

    let (_, entries) = parse(&path);
    assert_eq!(field(&entries[0], "loc"), Some("http://example.com/ab"));
    assert_eq!(field(&entries[1], "loc"), Some("http://example.com/line\rfeed"));
    assert_eq!(field(&entries[1], "changefreq"), Some("daily"));
}
