// src/engine/mod.rs
// =============================================================================
// This module orchestrates one full verification run.
//
// What happens here:
// 1. Fetch and parse {origin}/sitemap.xml (fatal if that fails)
// 2. Sweep every sitemap URL through the batched scheduler
// 3. Classify every outcome against the exception registry
// 4. Fetch each configured key page, sample its same-origin links, and
//    sweep those too (status check only -- a 404 is a broken link)
// 5. Aggregate all violations into a single Report
//
// The engine never aborts on a per-URL problem; the only fatal errors are
// "no sitemap" and "bad config", both of which make the run meaningless.
// Nothing is persisted between runs.
// =============================================================================

use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::checker::{
    classify, extract_same_origin_links, run_batched, Violation, ViolationKind,
};
use crate::config::{ExceptionRegistry, SiteConfig};
use crate::report::Report;
use crate::sitemap;

// Runs the full site health and crawlability verification
pub async fn verify_site(config: &SiteConfig) -> Result<Report> {
    let registry = ExceptionRegistry::from_config(config);
    let timeout = Duration::from_secs(config.timeout_secs);

    // One shared client for the whole run (connection pooling). The
    // client-level timeout also covers the sitemap and key-page fetches,
    // which run outside the scheduler's per-request timeout -- without it
    // a stalled sitemap endpoint would hang the run forever.
    let client = Client::builder()
        .timeout(timeout)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .context("failed to create HTTP client")?;

    let xml = sitemap::fetch_sitemap(&client, &config.origin).await?;
    let urls = sitemap::parse_sitemap(&xml);
    println!("📄 Sitemap lists {} URL(s)", urls.len());

    let outcomes = run_batched(&client, urls, config.batch_size, timeout).await;

    let mut violations = Vec::new();
    let mut total_checked = outcomes.len();

    for mut outcome in outcomes {
        // Asset-style URLs (queries, .xml, .pdf, thank-you pages) still
        // get their status checked but are exempt from the noindex rule.
        // Must-index pages are never exempt, even when their path happens
        // to look asset-like: zero tolerance includes the body inspection.
        if !sitemap::is_seo_relevant(&outcome.url)
            && !registry.is_must_be_indexable(&outcome.url)
        {
            outcome.body = None;
        }
        violations.extend(classify(&outcome, &registry));
    }

    if !config.key_pages.is_empty() {
        println!("🔗 Checking internal links on {} key page(s)", config.key_pages.len());
        let (link_violations, links_checked) =
            check_internal_links(&client, config, timeout).await;
        violations.extend(link_violations);
        total_checked += links_checked;
    }

    Ok(Report::new(violations, total_checked))
}

// Checks that internal links sampled from the key pages do not 404
//
// Each key page is fetched once; up to link_sample_cap same-origin links
// per page are collected and swept through the scheduler. Only a literal
// 404 counts as a broken link here -- classification (noindex, allow-
// lists) applies to the sitemap sweep, not to sampled links. A key page
// that cannot be loaded is a warning, not a violation: its own health is
// already covered by the sitemap sweep.
//
// Returns the violations plus how many links were checked.
async fn check_internal_links(
    client: &Client,
    config: &SiteConfig,
    timeout: Duration,
) -> (Vec<Violation>, usize) {
    // (source page, link) pairs so the report can name where the broken
    // link was found
    let mut candidates: Vec<(String, String)> = Vec::new();

    for path in &config.key_pages {
        let page_url = format!("{}{}", config.origin, path);

        match fetch_page(client, &page_url, timeout).await {
            Ok(html) => {
                let links =
                    extract_same_origin_links(&html, &config.origin, config.link_sample_cap);
                println!("   {} link(s) sampled on {}", links.len(), page_url);
                candidates.extend(links.into_iter().map(|link| (page_url.clone(), link)));
            }
            Err(e) => {
                eprintln!("⚠️  Could not load key page {}: {}", page_url, e);
            }
        }
    }

    let urls: Vec<String> = candidates.iter().map(|(_, link)| link.clone()).collect();
    let outcomes = run_batched(client, urls, config.batch_size, timeout).await;
    let total = outcomes.len();

    let mut violations = Vec::new();
    for ((source, _), outcome) in candidates.iter().zip(outcomes.iter()) {
        if outcome.status == Some(404) {
            violations.push(Violation::new(
                &outcome.url,
                ViolationKind::BadStatus,
                format!("internal link on {} returned 404", source),
            ));
        }
    }

    (violations, total)
}

// Fetches one key page's HTML, treating any non-2xx status as a failure
async fn fetch_page(client: &Client, url: &str, timeout: Duration) -> Result<String> {
    let response = tokio::time::timeout(timeout, client.get(url).send())
        .await
        .context("request timed out")??;

    if !response.status().is_success() {
        anyhow::bail!("HTTP {}", response.status().as_u16());
    }

    let html = tokio::time::timeout(timeout, response.text())
        .await
        .context("body read timed out")??;
    Ok(html)
}
