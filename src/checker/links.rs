// src/checker/links.rs
// =============================================================================
// This module extracts same-origin links from a key page's HTML.
//
// We use the `scraper` crate to find <a href> elements and the `url`
// crate to resolve relative hrefs against the site origin, the way a
// browser would. Only targets on the configured origin survive the
// filter, and at most `cap` of them are returned, in first-seen order.
//
// Malformed markup is not an error: it just yields fewer (or zero) links.
// Duplicates are kept; they are harmless to the scheduler and callers can
// dedupe if they want to.
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts up to `cap` same-origin link targets from an HTML document
//
// Parameters:
//   html: the page content to scan
//   origin: the site origin, no trailing slash ("https://example.com")
//   cap: maximum number of links to return
//
// Relative hrefs ("/pricing/") resolve against the origin; absolute hrefs
// are kept only if they start with the origin string. Anchors, mailto:,
// tel: and javascript: targets are skipped.
pub fn extract_same_origin_links(html: &str, origin: &str, cap: usize) -> Vec<String> {
    let mut links = Vec::new();

    let document = Html::parse_document(html);

    // The selector is a constant and known to be valid
    let selector = Selector::parse("a[href]").unwrap();

    let base = match Url::parse(origin) {
        Ok(url) => url,
        Err(_) => return links, // unusable origin, nothing to resolve against
    };

    for element in document.select(&selector) {
        if links.len() >= cap {
            break;
        }

        if let Some(href) = element.value().attr("href") {
            if let Some(absolute) = resolve_link(&base, href) {
                if absolute.starts_with(origin) {
                    links.push(absolute);
                }
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute URL
//
// Returns None for anchors and non-HTTP schemes, and for hrefs that do
// not resolve to a valid URL at all.
fn resolve_link(base: &Url, href: &str) -> Option<String> {
    // An empty href resolves to the page itself, which is not a link
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    match base.join(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.com";

    #[test]
    fn test_keeps_same_origin_relative_and_absolute() {
        let html = r#"
            <a href="/pricing/">Pricing</a>
            <a href="https://example.com/blog/">Blog</a>
            <a href="https://other.com/">Elsewhere</a>
        "#;
        let links = extract_same_origin_links(html, ORIGIN, 20);
        assert_eq!(
            links,
            vec![
                "https://example.com/pricing/",
                "https://example.com/blog/",
            ]
        );
    }

    #[test]
    fn test_caps_output() {
        let mut html = String::new();
        for i in 0..50 {
            html.push_str(&format!(r#"<a href="/page-{}/">p</a>"#, i));
        }
        let links = extract_same_origin_links(&html, ORIGIN, 20);
        assert_eq!(links.len(), 20);
        // First-seen order is preserved under the cap
        assert_eq!(links[0], "https://example.com/page-0/");
        assert_eq!(links[19], "https://example.com/page-19/");
    }

    #[test]
    fn test_skips_anchors_and_special_schemes() {
        // href="#..." contains the "# sequence, so wider raw-string
        // delimiters are needed here
        let html = r##"
            <a href="#section">Anchor</a>
            <a href="mailto:hi@example.com">Mail</a>
            <a href="tel:+123">Call</a>
            <a href="javascript:void(0)">JS</a>
        "##;
        let links = extract_same_origin_links(html, ORIGIN, 20);
        assert!(links.is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let html = r#"<a href="/a/">one</a><a href="/a/">two</a>"#;
        let links = extract_same_origin_links(html, ORIGIN, 20);
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_malformed_markup_yields_fewer_links_not_errors() {
        let html = r#"<a href="/ok/">fine</a><a href=>broken<div<<"#;
        let links = extract_same_origin_links(html, ORIGIN, 20);
        assert_eq!(links, vec!["https://example.com/ok/"]);
    }
}
