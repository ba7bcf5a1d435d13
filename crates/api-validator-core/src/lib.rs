// crates/api-validator-core/src/lib.rs
// ============================================================================
// Module: API Validator Core Library
// Description: Public API surface for the API Validator domain contract.
// Purpose: Expose account types, the error taxonomy, and the client capability.
// Dependencies: crate::{account, client, error}
// ============================================================================

//! ## Overview
//! API Validator core defines the contract an accounts API implementation is
//! validated against: the account wire model, the service error taxonomy, and
//! the [`AccountsClient`] capability consumed by conformance suites. It holds
//! no transport code; HTTP bindings live in `api-validator-client`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod account;
pub mod client;
pub mod error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use account::Account;
pub use account::AccountId;
pub use account::AccountsListing;
pub use client::AccountsClient;
pub use client::GetAccountDetailsOptions;
pub use client::GetAccountsOptions;
pub use error::ClientError;
pub use error::ErrorBody;
pub use error::ErrorType;
