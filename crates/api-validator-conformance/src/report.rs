// crates/api-validator-conformance/src/report.rs
// ============================================================================
// Module: Conformance Reports
// Description: Per-check outcomes and suite/run summaries.
// Purpose: Produce deterministic JSON and Markdown artifacts for a run.
// Dependencies: serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! A [`SuiteReport`] lists every check of a suite in execution order with its
//! outcome. A [`RunReport`] aggregates suites and maps the result to a process
//! exit code. JSON output uses RFC 8785 canonicalization so two runs with the
//! same outcomes differ only in timestamps and durations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::failure::CheckFailure;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator used when rendering check paths.
pub const PATH_SEPARATOR: &str = " › ";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckOutcome {
    /// The check held.
    Passed,
    /// The check found a counterexample or could not run.
    Failed {
        /// Failure details.
        failure: CheckFailure,
    },
    /// The check was excluded from the run.
    Skipped {
        /// Skip reason.
        reason: String,
    },
}

impl CheckOutcome {
    /// Returns the stable outcome label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed {
                ..
            } => "failed",
            Self::Skipped {
                ..
            } => "skipped",
        }
    }

    /// Returns the failure when the check failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&CheckFailure> {
        match self {
            Self::Failed {
                failure,
            } => Some(failure),
            _ => None,
        }
    }
}

/// Result of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Enclosing group names, outermost first.
    pub path: Vec<String>,
    /// Check name.
    pub name: String,
    /// Check outcome.
    pub outcome: CheckOutcome,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

impl CheckReport {
    /// Returns the full display path including the check name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = self.path.iter().map(String::as_str).collect();
        parts.push(&self.name);
        parts.join(PATH_SEPARATOR)
    }
}

/// Result of one suite.
///
/// # Invariants
/// - `checks` preserves execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Check results in execution order.
    pub checks: Vec<CheckReport>,
    /// Start timestamp (milliseconds since epoch).
    pub started_at_ms: u64,
    /// End timestamp (milliseconds since epoch).
    pub ended_at_ms: u64,
}

impl SuiteReport {
    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CheckOutcome::Passed))
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CheckOutcome::Failed { .. }))
    }

    /// Number of skipped checks.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, CheckOutcome::Skipped { .. }))
    }

    /// Returns true when no check failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Looks up a check by name.
    #[must_use]
    pub fn check(&self, name: &str) -> Option<&CheckReport> {
        self.checks.iter().find(|check| check.name == name)
    }

    /// Counts checks whose outcome matches the predicate.
    fn count(&self, predicate: impl Fn(&CheckOutcome) -> bool) -> usize {
        self.checks.iter().filter(|check| predicate(&check.outcome)).count()
    }
}

/// Aggregated result of every suite in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Suite results in execution order.
    pub suites: Vec<SuiteReport>,
}

impl RunReport {
    /// Builds a run report from suite reports.
    #[must_use]
    pub const fn new(suites: Vec<SuiteReport>) -> Self {
        Self {
            suites,
        }
    }

    /// Returns true when every suite succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.suites.iter().all(SuiteReport::is_success)
    }

    /// Process exit code for the run: 0 on success, 1 on check failures.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        u8::from(!self.is_success())
    }

    /// Serializes the report as canonical JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialize`] when serialization fails.
    pub fn to_canonical_json(&self) -> Result<Vec<u8>, ReportError> {
        serde_jcs::to_vec(self).map_err(|err| ReportError::Serialize(err.to_string()))
    }

    /// Writes the canonical JSON report, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when serialization or the write fails.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        let bytes = self.to_canonical_json()?;
        write_artifact(path, &bytes)
    }

    /// Writes the Markdown summary, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] when the write fails.
    pub fn write_markdown(&self, path: &Path) -> Result<(), ReportError> {
        write_artifact(path, self.to_markdown().as_bytes())
    }

    /// Renders the run as Markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# API Validator Report\n\n");
        let result = if self.is_success() { "PASS" } else { "FAIL" };
        let _ = writeln!(out, "- Result: {result}");
        for suite in &self.suites {
            let _ = write!(out, "\n## {}\n\n", suite.suite);
            let _ = writeln!(out, "- Passed: {}", suite.passed());
            let _ = writeln!(out, "- Failed: {}", suite.failed());
            let _ = writeln!(out, "- Skipped: {}\n", suite.skipped());
            out.push_str("| Result | Check | Detail |\n");
            out.push_str("| --- | --- | --- |\n");
            for check in &suite.checks {
                let _ = writeln!(
                    out,
                    "| {} | {} | {} |",
                    outcome_marker(&check.outcome),
                    escape_cell(&check.full_name()),
                    escape_cell(&outcome_detail(&check.outcome))
                );
            }
        }
        out
    }

    /// Renders a plain-text summary, one line per check plus totals.
    #[must_use]
    pub fn to_summary_text(&self) -> String {
        let mut out = String::new();
        let (mut passed, mut failed, mut skipped) = (0_usize, 0_usize, 0_usize);
        for suite in &self.suites {
            for check in &suite.checks {
                let _ = writeln!(out, "{} {}", outcome_marker(&check.outcome), check.full_name());
                let detail = outcome_detail(&check.outcome);
                if !detail.is_empty() {
                    let _ = writeln!(out, "     {detail}");
                }
            }
            passed += suite.passed();
            failed += suite.failed();
            skipped += suite.skipped();
        }
        let _ = writeln!(out, "{passed} passed, {failed} failed, {skipped} skipped");
        out
    }
}

/// Report output failures.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Report serialization failed.
    #[error("report serialization failed: {0}")]
    Serialize(String),
    /// Report file could not be written.
    #[error("report io error: {0}")]
    Io(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Short marker for an outcome.
const fn outcome_marker(outcome: &CheckOutcome) -> &'static str {
    match outcome {
        CheckOutcome::Passed => "PASS",
        CheckOutcome::Failed {
            ..
        } => "FAIL",
        CheckOutcome::Skipped {
            ..
        } => "SKIP",
    }
}

/// Human-readable detail for an outcome.
fn outcome_detail(outcome: &CheckOutcome) -> String {
    match outcome {
        CheckOutcome::Passed => String::new(),
        CheckOutcome::Failed {
            failure,
        } => failure.to_string(),
        CheckOutcome::Skipped {
            reason,
        } => reason.clone(),
    }
}

/// Escapes characters that would break a Markdown table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

/// Writes an artifact file, creating parent directories first.
fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| ReportError::Io(err.to_string()))?;
    }
    fs::write(path, bytes).map_err(|err| ReportError::Io(err.to_string()))
}
