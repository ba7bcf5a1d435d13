// crates/api-validator-conformance/src/lib.rs
// ============================================================================
// Module: API Validator Conformance Library
// Description: Check harness, accounts suite, reports, and event sinks.
// Purpose: Run conformance checks against any accounts client implementation.
// Dependencies: api-validator-core, serde, serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! Conformance suites are trees of named check groups. Each group may compute
//! fixtures once before its checks run; each check yields a pass, a typed
//! failure, or a skip when excluded by the run filter. Outcomes aggregate into
//! a [`SuiteReport`] that serializes to canonical JSON and renders to
//! Markdown, and every step is mirrored to a [`ConformanceEventSink`].
//!
//! The only suite shipped today is [`accounts::AccountsSuite`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod accounts;
pub mod events;
pub mod failure;
pub mod harness;
pub mod report;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use accounts::AccountsSuite;
pub use events::ConformanceEvent;
pub use events::ConformanceEventSink;
pub use events::FileEventSink;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use failure::CheckFailure;
pub use harness::CheckFilter;
pub use harness::CheckSpec;
pub use harness::SuiteRun;
pub use report::CheckOutcome;
pub use report::CheckReport;
pub use report::ReportError;
pub use report::RunReport;
pub use report::SuiteReport;
