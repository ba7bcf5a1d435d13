// crates/api-validator-mock/src/fixtures.rs
// ============================================================================
// Module: Mock Fixtures
// Description: Seeded accounts and fault flags for the mock server.
// Purpose: Describe what the mock serves and how it deviates from the contract.
// Dependencies: api-validator-core, serde_json
// ============================================================================

//! ## Overview
//! [`MockConfig::seeded`] produces deterministic accounts `acc_001`,
//! `acc_002`, ... each with a title, a status, and a single-asset balance.
//! [`MockFaults`] flags are independent and may be combined.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use api_validator_core::Account;
use api_validator_core::ErrorType;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Account held by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct MockAccount {
    /// Account identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Balances returned when requested.
    pub balances: Value,
}

impl MockAccount {
    /// Renders the account, attaching balances when `include_balances` is set.
    #[must_use]
    pub fn render(&self, id: &str, include_balances: bool) -> Account {
        let mut account = Account::new(id);
        account.extra.insert("title".to_string(), Value::String(self.title.clone()));
        account.extra.insert("status".to_string(), Value::String("active".to_string()));
        if include_balances {
            account = account.with_balances(self.balances.clone());
        }
        account
    }
}

/// Failure returned by every detail lookup when configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailFailure {
    /// HTTP status code.
    pub status: u16,
    /// Error discriminator in the body.
    pub error_type: ErrorType,
    /// Error message in the body.
    pub message: String,
}

/// Deviations from the accounts contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MockFaults {
    /// Include balances even when they were not requested.
    pub leak_balances_by_default: bool,
    /// Omit balances even when they were requested.
    pub omit_requested_balances: bool,
    /// Identifiers listed but unknown to the detail endpoint.
    pub hide_from_details: BTreeSet<String>,
    /// Identifier reported by every successful detail lookup.
    pub detail_id_override: Option<String>,
    /// Failure returned by every detail lookup.
    pub detail_failure: Option<DetailFailure>,
}

impl MockFaults {
    /// Decides whether a response carries balances.
    #[must_use]
    pub const fn include_balances(&self, requested: bool) -> bool {
        if requested { !self.omit_requested_balances } else { self.leak_balances_by_default }
    }
}

/// Full mock server configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MockConfig {
    /// Accounts in listing order.
    pub accounts: Vec<MockAccount>,
    /// Active faults.
    pub faults: MockFaults,
}

impl MockConfig {
    /// Builds a conformant configuration with `count` deterministic accounts.
    #[must_use]
    pub fn seeded(count: usize) -> Self {
        let accounts = (1..=count)
            .map(|index| MockAccount {
                id: format!("acc_{index:03}"),
                title: format!("Account {index}"),
                balances: json!([
                    {
                        "assetId": "USD",
                        "availableAmount": format!("{}.00", index * 100),
                    }
                ]),
            })
            .collect();
        Self {
            accounts,
            faults: MockFaults::default(),
        }
    }

    /// Returns the configuration with the given faults.
    #[must_use]
    pub fn with_faults(mut self, faults: MockFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Looks up an account by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MockAccount> {
        self.accounts.iter().find(|account| account.id == id)
    }
}
