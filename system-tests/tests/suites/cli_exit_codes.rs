// system-tests/tests/suites/cli_exit_codes.rs
// ============================================================================
// Module: CLI Exit Code Tests
// Description: Process-level coverage for `api-validator run`.
// Purpose: Validate exit statuses and report files of the real binary.
// Dependencies: system-tests helpers, api-validator-mock
// ============================================================================

//! ## Overview
//! Launches the compiled CLI against in-process mock servers and inspects the
//! exit status, stdout, and report files it produces.

use std::fs;

use api_validator_mock::MockConfig;
use api_validator_mock::MockFaults;
use helpers::artifacts::TestReporter;
use helpers::cli::cli_binary;
use helpers::cli::run_cli;
use helpers::target::Target;
use serde_json::Value;

use crate::helpers;

#[test]
fn run_exits_zero_for_conforming_server() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("run_exits_zero_for_conforming_server")?;
    let binary = cli_binary().ok_or("api-validator binary unavailable")?;
    let target = Target::seeded_mock()?;
    let base_url = target.base_url();
    let report_json = reporter.artifacts().path("report.json");
    let report_json = report_json.to_string_lossy();

    let output = run_cli(
        &binary,
        &["run", "--base-url", &base_url, "--event-log", "none", "--report-json", &report_json],
    )?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    reporter.artifacts().write_text("stdout.txt", &stdout)?;
    if output.status.code() != Some(0) {
        return Err(format!("expected exit 0, got {:?}\n{stdout}", output.status.code()).into());
    }
    if !stdout.contains("6 passed, 0 failed, 0 skipped") || !stdout.contains("Result: PASS") {
        return Err(format!("unexpected stdout:\n{stdout}").into());
    }
    let report = fs::read(reporter.artifacts().path("report.json"))?;
    let report: Value = serde_json::from_slice(&report)?;
    if report["suites"][0]["suite"] != "Accounts" {
        return Err(format!("unexpected report: {report}").into());
    }

    reporter.finish(
        "pass",
        vec![format!("validated {base_url}")],
        vec!["report.json".to_string(), "stdout.txt".to_string()],
    )?;
    Ok(())
}

#[test]
fn run_exits_one_when_a_check_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("run_exits_one_when_a_check_fails")?;
    let binary = cli_binary().ok_or("api-validator binary unavailable")?;
    let faults = MockFaults {
        omit_requested_balances: true,
        ..MockFaults::default()
    };
    let target = Target::mock(MockConfig::seeded(2).with_faults(faults))?;
    let base_url = target.base_url();

    let output = run_cli(&binary, &["run", "--base-url", &base_url, "--event-log", "none"])?;
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    reporter.artifacts().write_text("stdout.txt", &stdout)?;
    if output.status.code() != Some(1) {
        return Err(format!("expected exit 1, got {:?}\n{stdout}", output.status.code()).into());
    }
    if !stdout.contains("is missing balances although they were requested")
        || !stdout.contains("Result: FAIL")
    {
        return Err(format!("unexpected stdout:\n{stdout}").into());
    }

    reporter.finish("pass", vec!["omit_requested_balances".to_string()], vec![
        "stdout.txt".to_string(),
    ])?;
    Ok(())
}

#[test]
fn run_exits_two_when_setup_fails() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("run_exits_two_when_setup_fails")?;
    let binary = cli_binary().ok_or("api-validator binary unavailable")?;
    let missing = reporter.artifacts().path("missing.toml");
    let missing = missing.to_string_lossy();

    let output = run_cli(&binary, &["run", "--config", &missing])?;
    if output.status.code() != Some(2) {
        return Err(format!("expected exit 2, got {:?}", output.status.code()).into());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if !stderr.contains("Failed to load config") {
        return Err(format!("unexpected stderr:\n{stderr}").into());
    }
    if !output.stdout.is_empty() {
        return Err("setup failures must not print a summary".into());
    }

    reporter.finish("pass", vec![stderr], Vec::new())?;
    Ok(())
}
