// crates/launch-ledger-store-sqlite/src/lib.rs
// ============================================================================
// Module: Launch Ledger SQLite Store
// Description: Durable LaunchStore backed by SQLite.
// Purpose: Persist launch records across ingestion runs and query processes.
// Dependencies: launch-ledger-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `launch-ledger-store-sqlite` implements [`launch_ledger_core::LaunchStore`]
//! over a single `SQLite` table keyed by (`launch_id`, `launch_date`). Writes
//! are upserts and scans are keyset-paginated in primary-key order.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_RECORD_BYTES;
pub use store::SqliteLaunchStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
