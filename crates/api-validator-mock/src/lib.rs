// crates/api-validator-mock/src/lib.rs
// ============================================================================
// Module: API Validator Mock Library
// Description: Reference accounts server with fault injection.
// Purpose: Provide a known-good (or known-bad) target for the validator.
// Dependencies: axum, tokio, api-validator-core
// ============================================================================

//! ## Overview
//! The mock serves `GET /accounts` and `GET /accounts/{id}` from an in-memory
//! account set. With default [`MockFaults`] it is fully conformant; each fault
//! flag reproduces one way an implementation can break the accounts contract.
//!
//! Security posture: intended for loopback testing only; it performs no
//! authentication and accepts any request headers.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixtures;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixtures::DetailFailure;
pub use fixtures::MockAccount;
pub use fixtures::MockConfig;
pub use fixtures::MockFaults;
pub use server::MockError;
pub use server::MockServerHandle;
pub use server::RecordedRequest;
pub use server::router;
pub use server::serve;
pub use server::spawn;
