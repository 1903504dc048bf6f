// src/report/mod.rs
// =============================================================================
// This module aggregates per-URL violations into the run's final report.
//
// A Report is the terminal artifact of a verification run:
// - violations, in encounter order
// - how many checks were performed in total
// A report with zero violations is a pass. Rendering is deterministic:
// one line per violation, URL -> reason -> detail.
//
// Retries are not this module's concern; by the time violations arrive
// here every check has already settled.
// =============================================================================

use serde::Serialize;

use crate::checker::{Violation, ViolationKind};

// The final result of one verification run
#[derive(Debug, Serialize)]
pub struct Report {
    /// Every detected violation, in encounter order
    pub violations: Vec<Violation>,
    /// Total number of HTTP checks performed
    pub total_checked: usize,
}

impl Report {
    /// Builds a report from the collected violations of a run
    pub fn new(violations: Vec<Violation>, total_checked: usize) -> Self {
        Report {
            violations,
            total_checked,
        }
    }

    /// True when the run found nothing wrong
    pub fn is_passing(&self) -> bool {
        self.violations.is_empty()
    }

    /// Renders one human-readable diagnostic line per violation
    pub fn render_lines(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| format!("{} -> {} -> {}", v.url, kind_label(v.kind), v.detail))
            .collect()
    }
}

// Stable labels for violation kinds, used in the rendered report
pub fn kind_label(kind: ViolationKind) -> &'static str {
    match kind {
        ViolationKind::Unreachable => "UNREACHABLE",
        ViolationKind::BadStatus => "BAD STATUS",
        ViolationKind::UnexpectedNoIndex => "UNEXPECTED NOINDEX",
        ViolationKind::MissingRequiredIndex => "MISSING REQUIRED INDEX",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_passes() {
        let report = Report::new(Vec::new(), 42);
        assert!(report.is_passing());
        assert_eq!(report.total_checked, 42);
        assert!(report.render_lines().is_empty());
    }

    #[test]
    fn test_report_with_violations_fails() {
        let report = Report::new(
            vec![Violation::new(
                "https://ex.com/a/",
                ViolationKind::BadStatus,
                "returned HTTP 404".to_string(),
            )],
            10,
        );
        assert!(!report.is_passing());
    }

    #[test]
    fn test_rendering_preserves_encounter_order() {
        let report = Report::new(
            vec![
                Violation::new(
                    "https://ex.com/b/",
                    ViolationKind::UnexpectedNoIndex,
                    "page carries a noindex robots directive".to_string(),
                ),
                Violation::new(
                    "https://ex.com/a/",
                    ViolationKind::Unreachable,
                    "connection failed".to_string(),
                ),
            ],
            2,
        );
        let lines = report.render_lines();
        assert_eq!(
            lines,
            vec![
                "https://ex.com/b/ -> UNEXPECTED NOINDEX -> page carries a noindex robots directive",
                "https://ex.com/a/ -> UNREACHABLE -> connection failed",
            ]
        );
    }
}
