// system-tests/tests/suites/accounts_conformance.rs
// ============================================================================
// Module: Accounts Conformance Tests
// Description: End-to-end runs of the accounts suite against live servers.
// Purpose: Validate the full run pipeline over HTTP, reports included.
// Dependencies: system-tests helpers, api-validator-cli, api-validator-conformance
// ============================================================================

//! ## Overview
//! Runs the accounts suite through the same pipeline as `api-validator run`
//! and checks the report, event log, and wire traffic it leaves behind.

use std::fs;

use api_validator_cli::runner::run_accounts;
use api_validator_conformance::CheckFilter;
use api_validator_conformance::CheckFailure;
use api_validator_conformance::CheckOutcome;
use api_validator_conformance::RunReport;
use api_validator_conformance::accounts;
use api_validator_mock::MockConfig;
use api_validator_mock::RecordedRequest;
use helpers::artifacts::TestReporter;
use helpers::target::Target;
use helpers::timeouts::SUITE_TIMEOUT;
use helpers::timeouts::within;
use serde_json::Value;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn conforming_target_passes_every_check() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("conforming_target_passes_every_check")?;
    let target = Target::conforming()?;
    let config = target.validator_config(reporter.artifacts());

    let report = within(SUITE_TIMEOUT, run_accounts(&config, CheckFilter::all())).await??;
    let suite = &report.suites[0];
    if !report.is_success() || report.exit_code() != 0 {
        return Err(format!("expected a passing run, got:\n{}", report.to_summary_text()).into());
    }
    if suite.passed() != accounts::CHECKS.len() {
        let expected = accounts::CHECKS.len();
        return Err(format!("expected {expected} passes, got {}", suite.passed()).into());
    }

    let written = fs::read(reporter.artifacts().path("report.json"))?;
    let written: RunReport = serde_json::from_slice(&written)?;
    if written != report {
        return Err("report.json does not match the returned report".into());
    }
    let markdown = fs::read_to_string(reporter.artifacts().path("report.md"))?;
    if !markdown.contains("- Result: PASS") {
        return Err("report.md missing PASS result".into());
    }

    let events = fs::read_to_string(reporter.artifacts().path("events.jsonl"))?;
    let events: Vec<Value> =
        events.lines().map(serde_json::from_str).collect::<Result<_, _>>()?;
    let names: Vec<&str> = events.iter().filter_map(|event| event["event"].as_str()).collect();
    if names.first() != Some(&"suite_started") || names.last() != Some(&"suite_finished") {
        return Err(format!("event log not bracketed by suite events: {names:?}").into());
    }
    if names.len() != accounts::CHECKS.len() + 2 {
        return Err(format!("expected one event per check, got {names:?}").into());
    }

    reporter.finish(
        "pass",
        vec![format!("validated {}", target.base_url())],
        vec![
            "report.json".to_string(),
            "report.md".to_string(),
            "events.jsonl".to_string(),
        ],
    )?;
    let summary = fs::read(reporter.artifacts().path("summary.json"))?;
    let summary: Value = serde_json::from_slice(&summary)?;
    if summary["status"] != "pass" || !summary["duration_ms"].is_u64() {
        return Err(format!("unexpected summary.json: {summary}").into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn filter_limits_traffic_to_selected_groups() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("filter_limits_traffic_to_selected_groups")?;
    let target = Target::seeded_mock()?;
    let config = target.validator_config(reporter.artifacts());

    let filter = CheckFilter::new(Some("WITH BALANCES"));
    let report = within(SUITE_TIMEOUT, run_accounts(&config, filter)).await??;
    let suite = &report.suites[0];
    if suite.passed() != 2 || suite.skipped() != 4 || suite.failed() != 0 {
        return Err(format!("unexpected counts:\n{}", report.to_summary_text()).into());
    }
    let skipped = suite
        .check(accounts::LISTING_EXCLUDES_BALANCES.name)
        .map(|check| check.outcome.clone());
    if !matches!(skipped, Some(CheckOutcome::Skipped { .. })) {
        return Err(format!("default listing check should be skipped, got {skipped:?}").into());
    }

    let expected = vec![
        RecordedRequest {
            path: "/accounts".to_string(),
            query: None,
        },
        RecordedRequest {
            path: "/accounts".to_string(),
            query: Some("balances=true".to_string()),
        },
        RecordedRequest {
            path: "/accounts/acc_001".to_string(),
            query: Some("balances=true".to_string()),
        },
    ];
    if target.requests() != expected {
        return Err(format!("unexpected traffic: {:?}", target.requests()).into());
    }

    let artifacts = reporter.artifacts().write_run_report(&report)?;
    reporter.finish("pass", vec!["filter `WITH BALANCES`".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_listing_fails_detail_checks() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("empty_listing_fails_detail_checks")?;
    let target = Target::mock(MockConfig::seeded(0))?;
    let config = target.validator_config(reporter.artifacts());

    let report = within(SUITE_TIMEOUT, run_accounts(&config, CheckFilter::all())).await??;
    let suite = &report.suites[0];
    if report.exit_code() != 1 || suite.passed() != 3 || suite.failed() != 3 {
        return Err(format!("unexpected counts:\n{}", report.to_summary_text()).into());
    }
    for spec in [
        accounts::DETAILS_HAS_ACCOUNT,
        accounts::DETAILS_EXCLUDES_BALANCES,
        accounts::DETAILS_INCLUDES_BALANCES,
    ] {
        let failure = suite.check(spec.name).and_then(|check| check.outcome.failure());
        if failure != Some(&CheckFailure::NoAccounts) {
            let name = spec.name;
            return Err(format!("{name} should fail with no accounts, got {failure:?}").into());
        }
    }
    if target.requests().iter().any(|request| request.path != "/accounts") {
        return Err("detail endpoint must not be called without an account".into());
    }

    reporter.finish(
        "pass",
        vec!["empty listing".to_string()],
        vec!["report.json".to_string(), "report.md".to_string()],
    )?;
    Ok(())
}
