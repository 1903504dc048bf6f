// src/checker/mod.rs
// =============================================================================
// This module contains the per-URL checking logic.
//
// Submodules:
// - url: canonicalizes URLs for set-membership comparisons
// - batch: the batched fetch scheduler (bounded-concurrency HTTP sweep)
// - classify: turns fetch outcomes into crawlability violations
// - links: extracts same-origin links from key pages
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::run_batched()` instead of reaching into the
// submodules.
// =============================================================================

mod batch;
mod classify;
mod links;
mod url;

pub use batch::run_batched;
pub use classify::{classify, Violation, ViolationKind};
pub use links::extract_same_origin_links;
// self:: disambiguates from the external `url` crate
pub use self::url::normalize;
