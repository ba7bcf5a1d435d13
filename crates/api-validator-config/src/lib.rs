// crates/api-validator-config/src/lib.rs
// ============================================================================
// Module: API Validator Config Library
// Description: Canonical config model and fail-closed validation.
// Purpose: Single source of truth for api-validator.toml semantics.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! `api-validator-config` defines the configuration model shared by the CLI
//! and system tests: where the implementation under test lives, how the HTTP
//! client talks to it, and where reports and event logs go. Validation is
//! strict and fails closed.
//!
//! Security posture: config inputs are untrusted; bearer tokens are redacted
//! from debug output.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
