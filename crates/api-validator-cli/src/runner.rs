// crates/api-validator-cli/src/runner.rs
// ============================================================================
// Module: Suite Runner
// Description: Wires configuration, HTTP client, event log, and reports.
// Purpose: Execute the accounts suite exactly as the `run` command does.
// Dependencies: api-validator-client, api-validator-config, api-validator-conformance
// ============================================================================

//! ## Overview
//! [`run_accounts`] is the whole `run` pipeline minus argument parsing and
//! terminal output: it builds the HTTP client from validated configuration,
//! opens the configured event sink, runs the accounts suite, and persists the
//! JSON and Markdown reports when paths are configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_validator_client::HttpAccountsClient;
use api_validator_config::EventLogTarget;
use api_validator_config::ValidatorConfig;
use api_validator_conformance::AccountsSuite;
use api_validator_conformance::CheckFilter;
use api_validator_conformance::ConformanceEventSink;
use api_validator_conformance::FileEventSink;
use api_validator_conformance::NoopEventSink;
use api_validator_conformance::RunReport;
use api_validator_conformance::StderrEventSink;
use thiserror::Error;

use crate::t;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Setup and output failures around a suite run.
///
/// Check failures are not errors; they live in the returned report.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The HTTP client could not be constructed.
    #[error("{0}")]
    Client(String),
    /// The event log could not be opened.
    #[error("{0}")]
    EventLog(String),
    /// A report file could not be written.
    #[error("{0}")]
    Report(String),
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Opens the event sink selected by configuration.
///
/// # Errors
///
/// Returns [`RunnerError::EventLog`] when a log file cannot be opened.
pub fn open_event_sink(
    target: &EventLogTarget,
) -> Result<Box<dyn ConformanceEventSink>, RunnerError> {
    match target {
        EventLogTarget::Stderr => Ok(Box::new(StderrEventSink)),
        EventLogTarget::None => Ok(Box::new(NoopEventSink)),
        EventLogTarget::File(path) => FileEventSink::new(path)
            .map(|sink| Box::new(sink) as Box<dyn ConformanceEventSink>)
            .map_err(|err| {
                RunnerError::EventLog(t!(
                    "run.event_log_failed",
                    path = path.display(),
                    error = err
                ))
            }),
    }
}

/// Runs the accounts suite against the configured server.
///
/// # Errors
///
/// Returns [`RunnerError`] when setup or report output fails.
pub async fn run_accounts(
    config: &ValidatorConfig,
    filter: CheckFilter,
) -> Result<RunReport, RunnerError> {
    let client = HttpAccountsClient::from_config(&config.server)
        .map_err(|err| RunnerError::Client(t!("run.client_failed", error = err)))?;
    let sink = open_event_sink(&config.report.event_log)?;
    let suite = AccountsSuite::new(&client).run(filter, sink.as_ref()).await;
    let report = RunReport::new(vec![suite]);
    if let Some(path) = &config.report.json_path {
        report
            .write_json(path)
            .map_err(|err| RunnerError::Report(t!("run.report_failed", error = err)))?;
    }
    if let Some(path) = &config.report.markdown_path {
        report
            .write_markdown(path)
            .map_err(|err| RunnerError::Report(t!("run.report_failed", error = err)))?;
    }
    Ok(report)
}
