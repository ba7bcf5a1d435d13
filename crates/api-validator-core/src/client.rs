// crates/api-validator-core/src/client.rs
// ============================================================================
// Module: Accounts Client Capability
// Description: Async interface for the accounts list and detail operations.
// Purpose: Decouple conformance suites from any particular transport.
// Dependencies: async-trait, crate::{account, error}
// ============================================================================

//! ## Overview
//! The [`AccountsClient`] trait is the only capability conformance suites
//! consume. Both operations are idempotent reads. Implementations must not
//! retry on their own; a failed call is returned as-is so the caller can
//! classify it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;

use crate::account::Account;
use crate::account::AccountId;
use crate::account::AccountsListing;
use crate::error::ClientError;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Options for the list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetAccountsOptions {
    /// Request balances on every returned account.
    pub balances: bool,
}

impl GetAccountsOptions {
    /// Options requesting balances.
    #[must_use]
    pub const fn with_balances() -> Self {
        Self {
            balances: true,
        }
    }
}

/// Options for the detail operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetAccountDetailsOptions {
    /// Identifier of the account to fetch.
    pub account_id: AccountId,
    /// Request balances on the returned account.
    pub balances: bool,
}

impl GetAccountDetailsOptions {
    /// Options for a default detail lookup.
    #[must_use]
    pub const fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            balances: false,
        }
    }

    /// Returns the options with balances requested.
    #[must_use]
    pub const fn with_balances(mut self) -> Self {
        self.balances = true;
        self
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Accounts API capability.
#[async_trait]
pub trait AccountsClient: Send + Sync {
    /// Lists accounts.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails or the payload is invalid.
    async fn get_accounts(&self, options: GetAccountsOptions)
    -> Result<AccountsListing, ClientError>;

    /// Fetches a single account by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the call fails; unknown identifiers yield a
    /// service error whose type is [`crate::ErrorType::NotFound`].
    async fn get_account_details(
        &self,
        options: GetAccountDetailsOptions,
    ) -> Result<Account, ClientError>;
}
