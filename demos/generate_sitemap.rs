//! Generate a sitemap set and its index for a synthetic catalogue
//!
//! Run with `RUST_LOG=debug cargo run --example generate_sitemap` to see
//! rotation events.

use sitemapstream::{ChangeFrequency, SitemapConfig, SitemapWriter, UrlEntry};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = SitemapConfig::from_env().with_index_path("demos/output/sitemap_index.xml");
    let mut writer = SitemapWriter::builder()
        .with_config(config)
        .with_domain("https://shop.example.com/")
        .with_output_base("demos/output/sitemap")
        .build()?;

    writer.add_item(
        UrlEntry::new("")
            .with_priority(1.0)
            .with_changefreq(ChangeFrequency::Daily),
    )?;

    for id in 0..75_000i64 {
        writer.add_item(
            UrlEntry::new(format!("products/{id}"))
                .with_priority(0.6)
                .with_changefreq(ChangeFrequency::Weekly)
                .with_lastmod(1_700_000_000 + id * 60),
        )?;
    }
    writer.end_sitemap()?;

    for path in writer.sitemap_files().to_vec() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        writer.add_index_sitemap(&format!("https://shop.example.com/{name}"), None)?;
    }
    writer.end_index_sitemap()?;

    println!(
        "Wrote {} URLs across {} sitemap files, index at {}",
        writer.item_count(),
        writer.sitemap_files().len(),
        writer.index_path().display()
    );
    Ok(())
}
