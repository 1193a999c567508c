// crates/launch-ledger-core/src/lib.rs
// ============================================================================
// Module: Launch Ledger Core Library
// Description: Public API surface for the Launch Ledger core.
// Purpose: Expose record types, interfaces, and the ingestion/query runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Launch Ledger core normalizes upstream launch objects into a fixed record
//! shape, persists them idempotently into a partitioned key-value store, and
//! serves listings, lookups, filters, search, recency views, and statistics
//! over that store. Storage and upstream access are reached only through the
//! explicit interfaces in [`interfaces`]; the runtime never owns a global
//! client.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::LaunchSource;
pub use interfaces::LaunchStore;
pub use interfaces::LedgerEventSink;
pub use interfaces::ScanFilter;
pub use interfaces::ScanPage;
pub use interfaces::ScanRequest;
pub use interfaces::SourceError;
pub use interfaces::StoreError;
pub use runtime::FileEventSink;
pub use runtime::FilterCriteria;
pub use runtime::InMemoryLaunchStore;
pub use runtime::IngestError;
pub use runtime::IngestionPipeline;
pub use runtime::MemoryEventSink;
pub use runtime::NoopEventSink;
pub use runtime::QueryConfig;
pub use runtime::QueryError;
pub use runtime::QueryService;
pub use runtime::ReadFailurePolicy;
pub use runtime::StaticLaunchSource;
pub use runtime::StderrEventSink;
pub use runtime::Upserter;
