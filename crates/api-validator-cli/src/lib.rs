// crates/api-validator-cli/src/lib.rs
// ============================================================================
// Module: API Validator CLI Library
// Description: Shared pieces of the `api-validator` binary.
// Purpose: Expose the run pipeline and message catalog for reuse and tests.
// Dependencies: api-validator-client, api-validator-config, api-validator-conformance
// ============================================================================

//! ## Overview
//! The binary in `main.rs` only parses arguments and prints. The suite
//! pipeline lives in [`runner`] so system tests can drive the same code path
//! without spawning a process.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
pub mod runner;

#[cfg(test)]
mod tests;
