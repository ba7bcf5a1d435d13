// crates/api-validator-client/src/lib.rs
// ============================================================================
// Module: API Validator HTTP Client Library
// Description: HTTP binding of the accounts client capability.
// Purpose: Let conformance suites talk to a live implementation over HTTP.
// Dependencies: api-validator-core, api-validator-config, reqwest
// ============================================================================

//! ## Overview
//! [`HttpAccountsClient`] implements [`api_validator_core::AccountsClient`]
//! with reqwest. It resolves endpoints against a configured base URL, bounds
//! response sizes, decodes service error bodies, and never retries.
//!
//! Security posture: server responses are untrusted; apply size limits, fail
//! closed on parsing errors, and never log secrets.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::HttpAccountsClient;
pub use http::HttpClientConfig;
