// src/sitemap/mod.rs
// =============================================================================
// This module fetches and parses sitemap.xml.
//
// Key functionality:
// - Fetches {origin}/sitemap.xml; anything but HTTP 200 is fatal, because
//   without a URL list there is nothing to verify
// - Extracts every <loc>...</loc> entry in document order
// - Filters URLs down to the SEO-relevant subset for noindex inspection
//
// The parser is deliberately lenient: it scans for <loc> tags instead of
// validating the XML. A sitemap with broken markup that still contains
// recoverable <loc> entries yields partial results instead of failing --
// partial results are more useful than none for a health check.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use reqwest::Client;

/// Well-known sitemap path, relative to the site origin.
pub const SITEMAP_PATH: &str = "/sitemap.xml";

// Fetches the sitemap for a site origin and returns the raw XML text
//
// Fatal errors (the run cannot proceed without URLs):
// - the request itself fails
// - the response status is not 200
// - the body is not valid UTF-8
pub async fn fetch_sitemap(client: &Client, origin: &str) -> Result<String> {
    let sitemap_url = format!("{}{}", origin, SITEMAP_PATH);

    let response = client
        .get(&sitemap_url)
        .send()
        .await
        .with_context(|| format!("failed to fetch {}", sitemap_url))?;

    if response.status().as_u16() != 200 {
        return Err(anyhow!(
            "{} returned HTTP {}, expected 200",
            sitemap_url,
            response.status().as_u16()
        ));
    }

    // Decode the body ourselves so an undecodable sitemap is a clear
    // parse failure rather than silently mangled text
    let bytes = response.bytes().await.context("failed to read sitemap body")?;
    let xml = String::from_utf8(bytes.to_vec())
        .map_err(|_| anyhow!("sitemap body at {} is not valid UTF-8", sitemap_url))?;

    Ok(xml)
}

// Extracts every <loc> entry from sitemap XML, in document order
//
// Duplicates are preserved: sitemap correctness is not this tool's concern.
// Entries from a sitemap-index (<sitemap><loc>) are returned like any other
// <loc>; recursing into child sitemaps is a possible future extension.
pub fn parse_sitemap(xml: &str) -> Vec<String> {
    let mut urls = Vec::new();
    let mut rest = xml;

    // Scan for <loc>...</loc> pairs without validating the surrounding XML
    while let Some(start) = rest.find("<loc>") {
        let after_tag = &rest[start + "<loc>".len()..];
        match after_tag.find("</loc>") {
            Some(end) => {
                urls.push(after_tag[..end].trim().to_string());
                rest = &after_tag[end + "</loc>".len()..];
            }
            None => break, // unterminated tag, keep what we have
        }
    }

    urls
}

// Checks whether a URL is relevant for SEO indexing rules
//
// Asset-style and utility URLs are still status-checked during the sweep,
// but they are exempt from the noindex inspection:
// - thank-you / 404 / preview pages are never meant to rank
// - query-string URLs and .xml/.pdf documents are not indexable pages
pub fn is_seo_relevant(url: &str) -> bool {
    let lower = url.to_lowercase();

    let excluded = lower.contains("thank-you")
        || lower.contains("404")
        || lower.contains("preview")
        || lower.contains('?')
        || lower.ends_with(".xml")
        || lower.ends_with(".pdf");

    !excluded
}
