// system-tests/tests/helpers/target.rs
// ============================================================================
// Module: Validation Targets
// Description: Implementations under test for system-test suites.
// Purpose: Start the mock server or point at an external implementation.
// Dependencies: system-tests, api-validator-mock, api-validator-client, api-validator-config
// ============================================================================

//! ## Overview
//! A [`Target`] is whatever the suite validates. Fault scenarios always use an
//! in-process mock; the conformance scenario honors
//! `API_VALIDATOR_SYSTEM_TEST_TARGET_URL` so a real deployment can be checked
//! with the same test binary.

use api_validator_client::HttpAccountsClient;
use api_validator_client::HttpClientConfig;
use api_validator_config::EventLogTarget;
use api_validator_config::ValidatorConfig;
use api_validator_mock::MockConfig;
use api_validator_mock::MockServerHandle;
use api_validator_mock::RecordedRequest;
use system_tests::config::SystemTestConfig;

use super::artifacts::TestArtifacts;

/// Accounts seeded into the mock when no override is configured.
pub const DEFAULT_MOCK_ACCOUNTS: usize = 3;

/// Implementation under test.
pub enum Target {
    /// In-process mock server, shut down on drop.
    Mock(MockServerHandle),
    /// Externally managed implementation.
    External(String),
}

impl Target {
    /// Spawns a mock server with the given configuration.
    pub fn mock(config: MockConfig) -> Result<Self, String> {
        api_validator_mock::spawn(config).map(Self::Mock).map_err(|err| err.to_string())
    }

    /// Spawns a fault-free mock seeded from the environment.
    pub fn seeded_mock() -> Result<Self, String> {
        let config = SystemTestConfig::load()?;
        Self::mock(MockConfig::seeded(config.mock_accounts.unwrap_or(DEFAULT_MOCK_ACCOUNTS)))
    }

    /// Returns the external target when configured, else a seeded mock.
    pub fn conforming() -> Result<Self, String> {
        match SystemTestConfig::load()?.target_url {
            Some(url) => Ok(Self::External(url)),
            None => Self::seeded_mock(),
        }
    }

    /// Returns the base URL of the target.
    pub fn base_url(&self) -> String {
        match self {
            Self::Mock(handle) => handle.base_url(),
            Self::External(url) => url.clone(),
        }
    }

    /// Returns requests seen by a mock target; external targets report none.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        match self {
            Self::Mock(handle) => handle.requests(),
            Self::External(_) => Vec::new(),
        }
    }

    /// Builds an HTTP client for the target.
    pub fn client(&self) -> Result<HttpAccountsClient, String> {
        HttpAccountsClient::new(HttpClientConfig::new(self.base_url()))
            .map_err(|err| err.to_string())
    }

    /// Builds a validator configuration writing every output into `artifacts`.
    pub fn validator_config(&self, artifacts: &TestArtifacts) -> ValidatorConfig {
        let mut config = ValidatorConfig::default();
        config.server.base_url = self.base_url();
        config.report.json_path = Some(artifacts.path("report.json"));
        config.report.markdown_path = Some(artifacts.path("report.md"));
        config.report.event_log = EventLogTarget::File(artifacts.path("events.jsonl"));
        config
    }
}
