// src/config/mod.rs
// =============================================================================
// This module loads and validates the site configuration.
//
// The config is a JSON file describing editorial policy for one site:
// - the origin to verify
// - three exception sets (allowed noindex, allowed 403, must be indexable)
// - tuning knobs: batch size, per-request timeout, link sample cap
// - the key pages whose internal links get checked
//
// Everything here is read once at startup and never mutated afterwards.
// Config problems are fatal before any network activity happens: a run
// with a broken allow-list would produce misleading violations.
// =============================================================================

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use url::Url;

use crate::checker::normalize;

// The full configuration for one verification run
//
// Example config file:
// {
//   "origin": "https://www.example.com",
//   "allow_noindex": ["https://www.example.com/privacy/"],
//   "allow_403": ["https://www.example.com/trust-center/"],
//   "must_index": ["https://www.example.com/", "https://www.example.com/pricing/"],
//   "key_pages": ["/", "/pricing/", "/blog/"]
// }
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site origin, scheme + host, e.g. "https://www.example.com"
    pub origin: String,

    /// Pages allowed to carry a noindex robots meta tag
    #[serde(default)]
    pub allow_noindex: Vec<String>,

    /// Pages allowed to return exactly HTTP 403 (e.g. gated content)
    #[serde(default)]
    pub allow_403: Vec<String>,

    /// Pages that must stay indexable no matter what the allow-lists say
    #[serde(default)]
    pub must_index: Vec<String>,

    /// How many URLs to check concurrently per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// At most this many internal links are sampled per key page
    #[serde(default = "default_link_sample_cap")]
    pub link_sample_cap: usize,

    /// Key page paths ("/pricing/") whose internal links are checked
    #[serde(default)]
    pub key_pages: Vec<String>,
}

fn default_batch_size() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_link_sample_cap() -> usize {
    20
}

// Loads a SiteConfig from a JSON file and validates it
pub fn load_config(path: &Path) -> Result<SiteConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;

    let mut config: SiteConfig = serde_json::from_str(&text)
        .with_context(|| format!("config file {} is not valid JSON", path.display()))?;

    validate(&mut config)?;
    Ok(config)
}

// Validates the config before any network activity
//
// Also trims a trailing '/' off the origin so it can be used directly as
// a string prefix and in "{origin}{path}" concatenation.
fn validate(config: &mut SiteConfig) -> Result<()> {
    if config.origin.trim().is_empty() {
        bail!("config error: 'origin' must not be empty");
    }

    let parsed = Url::parse(&config.origin)
        .with_context(|| format!("config error: 'origin' is not a valid URL: {}", config.origin))?;
    if parsed.host_str().is_none() {
        bail!("config error: 'origin' has no host: {}", config.origin);
    }

    if config.batch_size == 0 {
        bail!("config error: 'batch_size' must be at least 1");
    }
    if config.timeout_secs == 0 {
        bail!("config error: 'timeout_secs' must be at least 1");
    }

    for path in &config.key_pages {
        if !path.starts_with('/') {
            bail!("config error: key page '{}' must start with '/'", path);
        }
    }

    while config.origin.ends_with('/') {
        config.origin.pop();
    }

    Ok(())
}

// The three exception sets consulted by the page classifier
//
// Allow-lists from different sources disagree on trailing-slash style, so
// every entry is normalized at construction and every lookup normalizes
// its argument. This registry is the single source of truth: there is
// exactly one per run, built once, with no mutation operations exposed.
#[derive(Debug)]
pub struct ExceptionRegistry {
    allow_noindex: HashSet<String>,
    allow_403: HashSet<String>,
    must_index: HashSet<String>,
}

impl ExceptionRegistry {
    /// Builds the registry from the three configured URL lists
    pub fn new(allow_noindex: &[String], allow_403: &[String], must_index: &[String]) -> Self {
        ExceptionRegistry {
            allow_noindex: normalized_set(allow_noindex),
            allow_403: normalized_set(allow_403),
            must_index: normalized_set(must_index),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(&config.allow_noindex, &config.allow_403, &config.must_index)
    }

    /// True if this page may carry a noindex robots meta tag
    pub fn is_noindex_allowed(&self, url: &str) -> bool {
        self.allow_noindex.contains(&normalize(url))
    }

    /// True if this page may return exactly HTTP 403
    pub fn is_status_403_allowed(&self, url: &str) -> bool {
        self.allow_403.contains(&normalize(url))
    }

    /// True if this page must be indexable, overriding both allow-lists
    pub fn is_must_be_indexable(&self, url: &str) -> bool {
        self.must_index.contains(&normalize(url))
    }
}

fn normalized_set(urls: &[String]) -> HashSet<String> {
    urls.iter().map(|u| normalize(u)).collect()
}
