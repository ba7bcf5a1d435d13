// system-tests/tests/suites/fault_matrix.rs
// ============================================================================
// Module: Fault Matrix Tests
// Description: One suite run per mock fault, over real HTTP.
// Purpose: Confirm each contract violation fails exactly the checks observing it.
// Dependencies: system-tests helpers, api-validator-conformance, api-validator-mock
// ============================================================================

//! ## Overview
//! Each case configures one [`MockFaults`] deviation, runs the accounts suite
//! through the HTTP client, and compares the set of failed checks and their
//! failure kinds against the expectation. Every other check must pass.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use api_validator_conformance::AccountsSuite;
use api_validator_conformance::CheckFilter;
use api_validator_conformance::MemoryEventSink;
use api_validator_conformance::RunReport;
use api_validator_conformance::SuiteReport;
use api_validator_conformance::accounts;
use api_validator_core::ErrorType;
use api_validator_mock::DetailFailure;
use api_validator_mock::MockConfig;
use api_validator_mock::MockFaults;
use helpers::artifacts::TestReporter;
use helpers::target::Target;
use helpers::timeouts::SUITE_TIMEOUT;
use helpers::timeouts::within;

use crate::helpers;

struct FaultCase {
    label: &'static str,
    faults: MockFaults,
    expected: &'static [(&'static str, &'static str)],
}

fn fault_cases() -> Vec<FaultCase> {
    vec![
        FaultCase {
            label: "leak_balances_by_default",
            faults: MockFaults {
                leak_balances_by_default: true,
                ..MockFaults::default()
            },
            expected: &[
                (accounts::LISTING_EXCLUDES_BALANCES.name, "unexpected_balances"),
                (accounts::DETAILS_EXCLUDES_BALANCES.name, "unexpected_balances"),
            ],
        },
        FaultCase {
            label: "omit_requested_balances",
            faults: MockFaults {
                omit_requested_balances: true,
                ..MockFaults::default()
            },
            expected: &[
                (accounts::LISTING_INCLUDES_BALANCES.name, "missing_balances"),
                (accounts::DETAILS_INCLUDES_BALANCES.name, "missing_balances"),
            ],
        },
        FaultCase {
            label: "hide_from_details",
            faults: MockFaults {
                hide_from_details: BTreeSet::from(["acc_002".to_string()]),
                ..MockFaults::default()
            },
            expected: &[(accounts::LISTING_RESOLVES_IN_DETAILS.name, "not_resolved")],
        },
        FaultCase {
            label: "detail_id_override",
            faults: MockFaults {
                detail_id_override: Some("acc_999".to_string()),
                ..MockFaults::default()
            },
            expected: &[(accounts::LISTING_RESOLVES_IN_DETAILS.name, "not_resolved")],
        },
        FaultCase {
            label: "detail_failure",
            faults: MockFaults {
                detail_failure: Some(DetailFailure {
                    status: 500,
                    error_type: ErrorType::InternalError,
                    message: "detail store offline".to_string(),
                }),
                ..MockFaults::default()
            },
            expected: &[
                (accounts::LISTING_RESOLVES_IN_DETAILS.name, "client"),
                (accounts::DETAILS_EXCLUDES_BALANCES.name, "fixture"),
                (accounts::DETAILS_INCLUDES_BALANCES.name, "fixture"),
            ],
        },
    ]
}

fn failed_kinds(report: &SuiteReport) -> BTreeMap<String, &'static str> {
    report
        .checks
        .iter()
        .filter_map(|check| {
            check.outcome.failure().map(|failure| (check.name.clone(), failure.kind()))
        })
        .collect()
}

#[tokio::test(flavor = "multi_thread")]
async fn each_fault_fails_only_its_checks() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("each_fault_fails_only_its_checks")?;
    let mut notes = Vec::new();

    for case in fault_cases() {
        let target = Target::mock(MockConfig::seeded(3).with_faults(case.faults))?;
        let client = target.client()?;
        let sink = MemoryEventSink::new();
        let suite = AccountsSuite::new(&client);
        let report = within(SUITE_TIMEOUT, suite.run(CheckFilter::all(), &sink)).await?;

        let expected: BTreeMap<String, &'static str> =
            case.expected.iter().map(|(name, kind)| ((*name).to_string(), *kind)).collect();
        let actual = failed_kinds(&report);
        if actual != expected {
            return Err(format!("{}: expected {expected:?}, got {actual:?}", case.label).into());
        }
        if report.passed() + report.failed() != accounts::CHECKS.len() {
            return Err(format!("{}: every check must run", case.label).into());
        }
        notes.push(format!("{}: {} failed as expected", case.label, actual.len()));
    }

    reporter.finish("pass", notes, Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failure_messages_name_the_offending_account() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("failure_messages_name_the_offending_account")?;
    let faults = MockFaults {
        hide_from_details: BTreeSet::from(["acc_003".to_string()]),
        ..MockFaults::default()
    };
    let target = Target::mock(MockConfig::seeded(3).with_faults(faults))?;
    let client = target.client()?;
    let sink = MemoryEventSink::new();
    let suite = AccountsSuite::new(&client);
    let report = within(SUITE_TIMEOUT, suite.run(CheckFilter::all(), &sink)).await?;

    let message = report
        .check(accounts::LISTING_RESOLVES_IN_DETAILS.name)
        .and_then(|check| check.outcome.failure())
        .map(ToString::to_string)
        .ok_or("resolution check should fail")?;
    if message != "account acc_003 was not found on the account details endpoint" {
        return Err(format!("unexpected message: {message}").into());
    }
    let logged = sink
        .events()
        .iter()
        .any(|event| event.failure_kind == Some("not_resolved"));
    if !logged {
        return Err("event log should carry the failure kind".into());
    }

    let artifacts = reporter.artifacts().write_run_report(&RunReport::new(vec![report]))?;
    reporter.finish("pass", vec![message], artifacts)?;
    Ok(())
}
