// src/checker/classify.rs
// =============================================================================
// This module turns one FetchOutcome into zero or more Violations.
//
// Rules, in order:
// 1. Transport error -> Unreachable
// 2. Status >= 400 -> BadStatus, unless the page is allow-listed for
//    exactly 403 (a 500 on a 403-allowed page still fails)
// 3. Body containing a noindex robots directive -> UnexpectedNoIndex,
//    unless the page is allow-listed for noindex
// 4. Pages in the must-index set get zero tolerance: any bad status and
//    any noindex directive is a violation, allow-lists notwithstanding --
//    "must be indexable" overrides "allowed to be excluded". Such a page
//    can therefore yield two violations from one outcome.
//
// Everything discovered here is data, never an error: the sweep always
// runs to completion and reports what it found.
// =============================================================================

use serde::Serialize;

use crate::checker::batch::FetchOutcome;
use crate::config::ExceptionRegistry;

// The kinds of crawlability violations we can detect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The URL never produced an HTTP response (timeout, DNS, refused)
    Unreachable,
    /// The URL answered with an unexpected 4xx/5xx status
    BadStatus,
    /// The page carries a noindex directive without being allow-listed
    UnexpectedNoIndex,
    /// A must-be-indexable page carries a noindex directive
    MissingRequiredIndex,
}

// One detected deviation from the site's crawlability rules
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// The URL the violation was detected on
    pub url: String,
    /// What kind of rule was broken
    pub kind: ViolationKind,
    /// Enough detail to act on without re-running the check
    pub detail: String,
}

impl Violation {
    pub fn new(url: &str, kind: ViolationKind, detail: String) -> Self {
        Violation {
            url: url.to_string(),
            kind,
            detail,
        }
    }
}

// Classifies a fetched page against the exception registry
//
// Returns zero, one, or (for a must-index page failing both ways) two
// violations for the outcome.
pub fn classify(outcome: &FetchOutcome, exceptions: &ExceptionRegistry) -> Vec<Violation> {
    let mut violations = Vec::new();

    if let Some(error) = &outcome.error {
        violations.push(Violation::new(
            &outcome.url,
            ViolationKind::Unreachable,
            error.clone(),
        ));
        return violations;
    }

    let must_index = exceptions.is_must_be_indexable(&outcome.url);

    if let Some(status) = outcome.status {
        if status >= 400 {
            // Only an exact 403 on a 403-allowed page passes, and never
            // on a must-index page
            let tolerated =
                !must_index && status == 403 && exceptions.is_status_403_allowed(&outcome.url);

            if !tolerated {
                let detail = if must_index {
                    format!("required page returned HTTP {}", status)
                } else {
                    format!("returned HTTP {}", status)
                };
                violations.push(Violation::new(&outcome.url, ViolationKind::BadStatus, detail));
            }

            // For ordinary pages an error status ends classification;
            // must-index pages additionally get the noindex inspection
            if !must_index {
                return violations;
            }
        }
    }

    if let Some(body) = &outcome.body {
        if has_noindex_directive(body) {
            if must_index {
                violations.push(Violation::new(
                    &outcome.url,
                    ViolationKind::MissingRequiredIndex,
                    "required page carries a noindex robots directive".to_string(),
                ));
            } else if !exceptions.is_noindex_allowed(&outcome.url) {
                violations.push(Violation::new(
                    &outcome.url,
                    ViolationKind::UnexpectedNoIndex,
                    "page carries a noindex robots directive".to_string(),
                ));
            }
        }
    }

    violations
}

// Detects a robots noindex directive in a page body
//
// A plain substring test for name="robots" co-occurring with "noindex"
// anywhere in the document. Deliberately not an HTML parse: a health
// check wants the cheap test the original SEO tooling used, and false
// positives surface as reviewable violations rather than silent passes.
pub fn has_noindex_directive(body: &str) -> bool {
    body.contains(r#"name="robots""#) && body.contains("noindex")
}
