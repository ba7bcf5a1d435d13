// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

use std::future::Future;
use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Default budget for a single suite run.
pub const SUITE_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the effective timeout, honoring `API_VALIDATOR_SYSTEM_TEST_TIMEOUT_SEC`.
/// The override acts as a minimum so slow targets only ever get more time.
pub fn resolve_timeout(requested: Duration) -> Result<Duration, String> {
    let config = SystemTestConfig::load()?;
    Ok(config.timeout.map_or(requested, |override_timeout| requested.max(override_timeout)))
}

/// Awaits `future` within the resolved timeout.
pub async fn within<F: Future>(requested: Duration, future: F) -> Result<F::Output, String> {
    let limit = resolve_timeout(requested)?;
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| format!("timed out after {}s", limit.as_secs()))
}
