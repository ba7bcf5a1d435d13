// system-tests/src/lib.rs
// ============================================================================
// Module: API Validator System Tests Library
// Description: Shared configuration for end-to-end validator scenarios.
// Purpose: Provide common settings for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts the environment-driven configuration shared by the
//! system-test binaries in `system-tests/tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
