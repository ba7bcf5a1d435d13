// crates/api-validator-conformance/src/harness.rs
// ============================================================================
// Module: Check Harness
// Description: Check declarations, run filtering, and outcome recording.
// Purpose: Give suites a resource-agnostic way to execute grouped checks.
// Dependencies: api-validator-core, crate::{events, failure, report}
// ============================================================================

//! ## Overview
//! A suite declares its checks up front as [`CheckSpec`] values whose `path`
//! lists the enclosing group names. Declaring the tree statically lets a
//! [`SuiteRun`] decide whether a group has any selected checks before the
//! suite fetches that group's fixtures.
//!
//! Suites drive execution themselves: [`SuiteRun::begin`] starts a check (or
//! records it as skipped), [`SuiteRun::finish`] records its result, and
//! [`SuiteRun::fail_group`] fails everything nested under a group whose
//! fixture could not be built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Instant;

use api_validator_core::ClientError;

use crate::events::ConformanceEvent;
use crate::events::ConformanceEventSink;
use crate::events::now_millis;
use crate::failure::CheckFailure;
use crate::report::CheckOutcome;
use crate::report::CheckReport;
use crate::report::PATH_SEPARATOR;
use crate::report::SuiteReport;

// ============================================================================
// SECTION: Check Declarations
// ============================================================================

/// Static declaration of a check.
///
/// # Invariants
/// - `path` is non-empty and starts with the suite's root group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSpec {
    /// Enclosing group names, outermost first.
    pub path: &'static [&'static str],
    /// Check name; user-visible and stable.
    pub name: &'static str,
}

impl CheckSpec {
    /// Declares a check.
    #[must_use]
    pub const fn new(path: &'static [&'static str], name: &'static str) -> Self {
        Self {
            path,
            name,
        }
    }

    /// Returns the full display path including the check name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut parts = self.path.to_vec();
        parts.push(self.name);
        parts.join(PATH_SEPARATOR)
    }

    /// Returns true when the check is nested under the group.
    #[must_use]
    pub fn is_in_group(&self, group: &[&str]) -> bool {
        self.path.starts_with(group)
    }
}

/// Case-insensitive substring filter over full check paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckFilter {
    /// Lowercased needle; `None` selects every check.
    needle: Option<String>,
}

impl CheckFilter {
    /// Filter selecting every check.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            needle: None,
        }
    }

    /// Builds a filter from optional user input; blank input selects all.
    #[must_use]
    pub fn new(text: Option<&str>) -> Self {
        let needle = text.map(str::trim).filter(|text| !text.is_empty()).map(str::to_lowercase);
        Self {
            needle,
        }
    }

    /// Returns true when the check is selected.
    #[must_use]
    pub fn matches(&self, spec: &CheckSpec) -> bool {
        self.needle
            .as_deref()
            .is_none_or(|needle| spec.full_name().to_lowercase().contains(needle))
    }

    /// Returns the raw needle, if any.
    #[must_use]
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }
}

// ============================================================================
// SECTION: Suite Run
// ============================================================================

/// Handle for a check that has started.
#[derive(Debug)]
pub struct CheckTimer {
    /// Check being timed.
    spec: CheckSpec,
    /// Start instant.
    started: Instant,
}

/// Recorder for a single suite execution.
pub struct SuiteRun<'a> {
    /// Suite name.
    suite: String,
    /// Every check the suite declares, in execution order.
    checks: &'static [CheckSpec],
    /// Active check filter.
    filter: CheckFilter,
    /// Event sink for progress events.
    sink: &'a dyn ConformanceEventSink,
    /// Start timestamp (milliseconds since epoch).
    started_at_ms: u64,
    /// Recorded check results.
    reports: Vec<CheckReport>,
}

impl<'a> SuiteRun<'a> {
    /// Starts a suite run and emits `suite_started`.
    #[must_use]
    pub fn new(
        suite: &str,
        checks: &'static [CheckSpec],
        filter: CheckFilter,
        sink: &'a dyn ConformanceEventSink,
    ) -> Self {
        sink.record(&ConformanceEvent::suite_started(suite));
        Self {
            suite: suite.to_string(),
            checks,
            filter,
            sink,
            started_at_ms: now_millis(),
            reports: Vec::with_capacity(checks.len()),
        }
    }

    /// Returns true when at least one check under the group is selected.
    #[must_use]
    pub fn group_selected(&self, group: &[&str]) -> bool {
        self.checks.iter().any(|spec| spec.is_in_group(group) && self.filter.matches(spec))
    }

    /// Starts a check, or records it as skipped when the filter excludes it.
    pub fn begin(&mut self, spec: &CheckSpec) -> Option<CheckTimer> {
        if self.filter.matches(spec) {
            return Some(CheckTimer {
                spec: *spec,
                started: Instant::now(),
            });
        }
        let reason = match self.filter.needle() {
            Some(needle) => format!("excluded by filter `{needle}`"),
            None => "excluded by filter".to_string(),
        };
        let outcome = CheckOutcome::Skipped {
            reason,
        };
        self.record(spec, outcome, 0);
        None
    }

    /// Records the result of a started check.
    pub fn finish(&mut self, timer: CheckTimer, result: Result<(), CheckFailure>) {
        let outcome = match result {
            Ok(()) => CheckOutcome::Passed,
            Err(failure) => CheckOutcome::Failed {
                failure,
            },
        };
        let duration_ms = u64::try_from(timer.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.record(&timer.spec, outcome, duration_ms);
    }

    /// Runs a synchronous check body.
    pub fn run_check(&mut self, spec: &CheckSpec, body: impl FnOnce() -> Result<(), CheckFailure>) {
        if let Some(timer) = self.begin(spec) {
            let result = body();
            self.finish(timer, result);
        }
    }

    /// Records every check under the group as skipped.
    pub fn skip_group(&mut self, group: &[&str]) {
        for spec in self.group_checks(group) {
            let _ = self.begin(&spec);
        }
    }

    /// Fails every selected check under the group after a fixture error.
    pub fn fail_group(&mut self, group: &[&str], fixture: &str, error: &ClientError) {
        let failure = CheckFailure::fixture(fixture, error);
        self.sink.record(&ConformanceEvent::fixture_failed(
            &self.suite,
            &group.join(PATH_SEPARATOR),
            fixture,
            &failure.to_string(),
        ));
        for spec in self.group_checks(group) {
            if let Some(timer) = self.begin(&spec) {
                self.finish(timer, Err(failure.clone()));
            }
        }
    }

    /// Finalizes the run and emits `suite_finished`.
    #[must_use]
    pub fn into_report(self) -> SuiteReport {
        let report = SuiteReport {
            suite: self.suite,
            checks: self.reports,
            started_at_ms: self.started_at_ms,
            ended_at_ms: now_millis(),
        };
        self.sink.record(&ConformanceEvent::suite_finished(&report));
        report
    }

    /// Checks nested under the group, in declaration order.
    fn group_checks(&self, group: &[&str]) -> Vec<CheckSpec> {
        self.checks.iter().filter(|spec| spec.is_in_group(group)).copied().collect()
    }

    /// Stores a check result and emits `check_finished`.
    fn record(&mut self, spec: &CheckSpec, outcome: CheckOutcome, duration_ms: u64) {
        let report = CheckReport {
            path: spec.path.iter().map(|segment| (*segment).to_string()).collect(),
            name: spec.name.to_string(),
            outcome,
            duration_ms,
        };
        self.sink.record(&ConformanceEvent::check_finished(&self.suite, &report));
        self.reports.push(report);
    }
}
