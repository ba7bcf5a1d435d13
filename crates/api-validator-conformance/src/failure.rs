// crates/api-validator-conformance/src/failure.rs
// ============================================================================
// Module: Check Failures
// Description: Typed reasons a conformance check did not pass.
// Purpose: Give reports and events a stable, serializable failure taxonomy.
// Dependencies: api-validator-core, serde, thiserror
// ============================================================================

//! ## Overview
//! Failures carry the offending account id when one exists, so a report line
//! names exactly what mismatched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use api_validator_core::AccountId;
use api_validator_core::ClientError;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Reason a check failed.
///
/// # Invariants
/// - The serialized `kind` tag is stable across releases.
/// - Each variant names the first counterexample only; checks are fail-fast.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckFailure {
    /// An account carried balances that were not requested.
    #[error("account {account_id} has balances although none were requested")]
    UnexpectedBalances {
        /// Offending account.
        account_id: AccountId,
    },
    /// An account lacked balances that were requested.
    #[error("account {account_id} is missing balances although they were requested")]
    MissingBalances {
        /// Offending account.
        account_id: AccountId,
    },
    /// A listed account did not resolve on the detail endpoint.
    #[error("account {account_id} was not found on the account details endpoint")]
    NotResolved {
        /// Offending account.
        account_id: AccountId,
    },
    /// The listing was empty so no representative account exists.
    #[error("no accounts available to test detail endpoint")]
    NoAccounts,
    /// A fixture of an enclosing group failed.
    #[error("fixture `{fixture}` failed: {error}")]
    Fixture {
        /// Fixture name.
        fixture: String,
        /// Full client error text.
        error: String,
    },
    /// A client call made by the check itself failed.
    #[error("client error: {error}")]
    Client {
        /// Full client error text.
        error: String,
    },
}

impl CheckFailure {
    /// Returns the stable kind label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnexpectedBalances {
                ..
            } => "unexpected_balances",
            Self::MissingBalances {
                ..
            } => "missing_balances",
            Self::NotResolved {
                ..
            } => "not_resolved",
            Self::NoAccounts => "no_accounts",
            Self::Fixture {
                ..
            } => "fixture",
            Self::Client {
                ..
            } => "client",
        }
    }

    /// Wraps a fixture error.
    #[must_use]
    pub fn fixture(fixture: &str, error: &ClientError) -> Self {
        Self::Fixture {
            fixture: fixture.to_string(),
            error: error.to_string(),
        }
    }
}

impl From<ClientError> for CheckFailure {
    fn from(error: ClientError) -> Self {
        Self::Client {
            error: error.to_string(),
        }
    }
}
