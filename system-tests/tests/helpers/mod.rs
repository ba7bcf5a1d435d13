// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for validator system-tests.
// Purpose: Provide target servers, CLI resolution, and artifact utilities.
// Dependencies: system-tests, api-validator-mock, api-validator-client
// ============================================================================

//! ## Overview
//! Shared helpers for validator system-tests.
//! Invariants:
//! - Every test records a summary under its own run root.
//! - Mock servers are torn down when their handle drops.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod artifacts;
pub mod cli;
pub mod target;
pub mod timeouts;
