// src/checker/url.rs
// =============================================================================
// This module canonicalizes URLs for stable set-membership checks.
//
// Why normalize?
// - Sitemap entries, allow-list entries, and in-page hrefs come from
//   different sources with different trailing-slash styles
// - "https://example.com/pricing" and "https://example.com/pricing/" must
//   compare equal when we look them up in an exception set
//
// The rule: append a trailing '/' unless the URL
// - already ends with one, or
// - carries a query string, or
// - ends in a recognized file extension (sitemap.xml, whitepaper.pdf, ...)
// in which case it is compared verbatim.
// =============================================================================

// File extensions that mark a URL as a document/asset rather than a page.
// Such URLs never get a trailing slash appended.
const FILE_EXTENSIONS: &[&str] = &[
    ".xml", ".pdf", ".txt", ".json", ".jpg", ".jpeg", ".png", ".svg", ".ico",
];

// Normalizes a URL to its trailing-slash form
//
// Normalization is total: every input produces an output, there is no
// error path. It is also idempotent: normalize(normalize(u)) == normalize(u).
//
// Examples:
//   "https://example.com/pricing"      -> "https://example.com/pricing/"
//   "https://example.com/pricing/"     -> unchanged
//   "https://example.com/search?q=rs"  -> unchanged (query string)
//   "https://example.com/sitemap.xml"  -> unchanged (file extension)
pub fn normalize(url: &str) -> String {
    if url.ends_with('/') || url.contains('?') || has_file_extension(url) {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

// Checks whether the URL ends in one of the recognized file extensions
fn has_file_extension(url: &str) -> bool {
    let lower = url.to_lowercase();
    FILE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
