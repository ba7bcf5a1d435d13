// crates/api-validator-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Library Tests
// Description: Unit test modules for the CLI library.
// Purpose: Group catalog and runner tests.
// Dependencies: api-validator-cli
// ============================================================================

//! ## Overview
//! Test modules for the message catalog and the suite runner.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only panic-based assertions are permitted."
)]
