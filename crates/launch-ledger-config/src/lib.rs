// crates/launch-ledger-config/src/lib.rs
// ============================================================================
// Module: Launch Ledger Config Library
// Description: Configuration model and validation for the launch ledger.
// Purpose: Single source of truth for launch-ledger.toml semantics.
// Dependencies: launch-ledger-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `launch-ledger-config` defines the configuration model for the ledger
//! binary. Every section is validated after parsing and the crate builds the
//! runtime configs for the fetcher, the store, and the query service from it.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
