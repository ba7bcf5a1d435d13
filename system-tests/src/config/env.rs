// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed settings for validator system tests.
// Purpose: Choose the validation target, artifact root, and time budget.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every setting is optional. Set values must be valid UTF-8 and non-blank;
//! anything else fails the load instead of silently falling back.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Keys
// ============================================================================

/// Environment keys read by [`SystemTestConfig::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Directory receiving per-test artifacts.
    RunRoot,
    /// Base URL of an external implementation to validate instead of the mock.
    TargetUrl,
    /// Number of accounts seeded into the mock server.
    MockAccounts,
    /// Minimum suite timeout in seconds.
    TimeoutSeconds,
    /// Reuse an existing run root (`true`/`false` or `1`/`0`).
    AllowOverwrite,
}

impl SystemTestEnv {
    /// Every key, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::RunRoot,
        Self::TargetUrl,
        Self::MockAccounts,
        Self::TimeoutSeconds,
        Self::AllowOverwrite,
    ];

    /// Returns the environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "API_VALIDATOR_SYSTEM_TEST_RUN_ROOT",
            Self::TargetUrl => "API_VALIDATOR_SYSTEM_TEST_TARGET_URL",
            Self::MockAccounts => "API_VALIDATOR_SYSTEM_TEST_MOCK_ACCOUNTS",
            Self::TimeoutSeconds => "API_VALIDATOR_SYSTEM_TEST_TIMEOUT_SEC",
            Self::AllowOverwrite => "API_VALIDATOR_SYSTEM_TEST_ALLOW_OVERWRITE",
        }
    }

    /// Reads the variable, rejecting invalid UTF-8 and blank values.
    fn read(self) -> Result<Option<String>, String> {
        let name = self.as_str();
        let Some(raw) = std::env::var_os(name) else {
            return Ok(None);
        };
        let value = raw.into_string().map_err(|_| format!("{name} must be valid UTF-8"))?;
        if value.trim().is_empty() {
            return Err(format!("{name} must not be empty"));
        }
        Ok(Some(value))
    }

    /// Reads the variable as a positive integer.
    fn read_positive(self) -> Result<Option<u64>, String> {
        let Some(value) = self.read()? else {
            return Ok(None);
        };
        match value.trim().parse::<u64>() {
            Ok(0) | Err(_) => Err(format!("{} must be a positive integer", self.as_str())),
            Ok(parsed) => Ok(Some(parsed)),
        }
    }

    /// Reads the variable as a boolean flag; unset means false.
    fn read_flag(self) -> Result<bool, String> {
        match self.read()?.as_deref().map(str::trim) {
            None => Ok(false),
            Some(value) if value == "1" || value.eq_ignore_ascii_case("true") => Ok(true),
            Some(value) if value == "0" || value.eq_ignore_ascii_case("false") => Ok(false),
            Some(_) => Err(format!("{} must be 1, 0, true, or false", self.as_str())),
        }
    }
}

// ============================================================================
// SECTION: Config
// ============================================================================

/// System-test settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Artifact root; each test writes into its own subdirectory.
    pub run_root: Option<PathBuf>,
    /// External implementation base URL.
    pub target_url: Option<String>,
    /// Mock seed size.
    pub mock_accounts: Option<usize>,
    /// Minimum suite timeout.
    pub timeout: Option<Duration>,
    /// Whether an existing per-test run root may be reused.
    pub allow_overwrite: bool,
}

impl SystemTestConfig {
    /// Loads settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending variable when a value is not
    /// UTF-8, blank, or malformed.
    pub fn load() -> Result<Self, String> {
        let mock_accounts = SystemTestEnv::MockAccounts
            .read_positive()?
            .map(|count| {
                usize::try_from(count)
                    .map_err(|_| format!("{} is too large", SystemTestEnv::MockAccounts.as_str()))
            })
            .transpose()?;
        Ok(Self {
            run_root: SystemTestEnv::RunRoot.read()?.map(PathBuf::from),
            target_url: SystemTestEnv::TargetUrl.read()?,
            mock_accounts,
            timeout: SystemTestEnv::TimeoutSeconds.read_positive()?.map(Duration::from_secs),
            allow_overwrite: SystemTestEnv::AllowOverwrite.read_flag()?,
        })
    }
}
