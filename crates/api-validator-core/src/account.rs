// crates/api-validator-core/src/account.rs
// ============================================================================
// Module: Account Model
// Description: Wire model for accounts and account listings.
// Purpose: Preserve optional-field presence so conformance checks can assert it.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Accounts are decoded from untrusted service payloads. Only the identifier
//! and the optional `balances` field carry meaning for conformance; every other
//! field is retained opaquely so reports and fixtures can round-trip it.
//!
//! Presence of `balances` follows the wire: a missing key is absent, while an
//! explicit `null` is present. [`deserialize_present`] keeps that distinction,
//! which a plain `Option<Value>` would collapse.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Identifiers
// ============================================================================

/// Account identifier, unique within a listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new account identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// SECTION: Account Types
// ============================================================================

/// Account resource returned by the list and detail endpoints.
///
/// # Invariants
/// - `balances` is `Some` exactly when the payload carried a `balances` key,
///   including `"balances": null`.
/// - `extra` never contains the `id` or `balances` keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Opaque balances structure, present only when requested.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub balances: Option<Value>,
    /// Remaining account fields, preserved without interpretation.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Account {
    /// Creates an account with no balances and no extra fields.
    #[must_use]
    pub fn new(id: impl Into<AccountId>) -> Self {
        Self {
            id: id.into(),
            balances: None,
            extra: Map::new(),
        }
    }

    /// Returns the account with the given balances attached.
    #[must_use]
    pub fn with_balances(mut self, balances: Value) -> Self {
        self.balances = Some(balances);
        self
    }

    /// Returns true when the `balances` field is present.
    #[must_use]
    pub const fn has_balances(&self) -> bool {
        self.balances.is_some()
    }
}

/// Response payload of the list endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AccountsListing {
    /// Accounts in service order.
    pub accounts: Vec<Account>,
}

impl AccountsListing {
    /// Returns the identifier of the first account, if any.
    #[must_use]
    pub fn first_id(&self) -> Option<&AccountId> {
        self.accounts.first().map(|account| &account.id)
    }

    /// Returns true when the listing holds no accounts.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

// ============================================================================
// SECTION: Serde Helpers
// ============================================================================

/// Deserializes a present field into `Some`, keeping explicit `null` values.
///
/// Paired with `#[serde(default)]`, a missing key stays `None`.
///
/// # Errors
///
/// Returns the deserializer error when the field is not valid JSON.
pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
