// crates/api-validator-conformance/src/events.rs
// ============================================================================
// Module: Conformance Event Log
// Description: Structured events emitted while a suite runs.
// Purpose: Stream suite progress as JSON lines without a logging framework.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Events are flat JSON objects written one per line. Sinks are pluggable so
//! the CLI can target stderr or a file and tests can inspect events in memory.
//! Sink failures are swallowed; the event log never changes a run's outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::report::CheckReport;
use crate::report::SuiteReport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Suite execution event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConformanceEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u64,
    /// Suite name.
    pub suite: String,
    /// Check or group path when the event concerns one.
    pub check: Option<String>,
    /// Fixture name for fixture events.
    pub fixture: Option<String>,
    /// Outcome label.
    pub outcome: Option<&'static str>,
    /// Failure kind label.
    pub failure_kind: Option<&'static str>,
    /// Failure or summary message.
    pub message: Option<String>,
    /// Check duration in milliseconds.
    pub duration_ms: Option<u64>,
}

impl ConformanceEvent {
    /// Builds an event with only the identifying fields set.
    fn base(event: &'static str, suite: &str) -> Self {
        Self {
            event,
            timestamp_ms: now_millis(),
            suite: suite.to_string(),
            check: None,
            fixture: None,
            outcome: None,
            failure_kind: None,
            message: None,
            duration_ms: None,
        }
    }

    /// Suite execution started.
    #[must_use]
    pub fn suite_started(suite: &str) -> Self {
        Self::base("suite_started", suite)
    }

    /// A group fixture failed; nested checks will be failed.
    #[must_use]
    pub fn fixture_failed(suite: &str, group: &str, fixture: &str, message: &str) -> Self {
        Self {
            check: Some(group.to_string()),
            fixture: Some(fixture.to_string()),
            outcome: Some("failed"),
            failure_kind: Some("fixture"),
            message: Some(message.to_string()),
            ..Self::base("fixture_failed", suite)
        }
    }

    /// A check produced an outcome.
    #[must_use]
    pub fn check_finished(suite: &str, report: &CheckReport) -> Self {
        let failure = report.outcome.failure();
        Self {
            check: Some(report.full_name()),
            outcome: Some(report.outcome.label()),
            failure_kind: failure.map(crate::failure::CheckFailure::kind),
            message: failure.map(ToString::to_string),
            duration_ms: Some(report.duration_ms),
            ..Self::base("check_finished", suite)
        }
    }

    /// Suite execution finished.
    #[must_use]
    pub fn suite_finished(report: &SuiteReport) -> Self {
        Self {
            outcome: Some(if report.is_success() { "passed" } else { "failed" }),
            message: Some(format!(
                "{} passed, {} failed, {} skipped",
                report.passed(),
                report.failed(),
                report.skipped()
            )),
            duration_ms: Some(report.ended_at_ms.saturating_sub(report.started_at_ms)),
            ..Self::base("suite_finished", &report.suite)
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Sink for suite execution events.
pub trait ConformanceEventSink: Send + Sync {
    /// Record an event.
    fn record(&self, event: &ConformanceEvent);
}

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl ConformanceEventSink for StderrEventSink {
    fn record(&self, event: &ConformanceEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Event sink that logs JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileEventSink {
    /// Opens the event log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ConformanceEventSink for FileEventSink {
    fn record(&self, event: &ConformanceEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op event sink.
pub struct NoopEventSink;

impl ConformanceEventSink for NoopEventSink {
    fn record(&self, _event: &ConformanceEvent) {}
}

/// Event sink that keeps events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events in arrival order.
    events: Mutex<Vec<ConformanceEvent>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<ConformanceEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }
}

impl ConformanceEventSink for MemoryEventSink {
    fn record(&self, event: &ConformanceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
