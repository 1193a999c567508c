// crates/launch-ledger-core/src/runtime/mod.rs
// ============================================================================
// Module: Launch Ledger Runtime
// Description: Ingestion pipeline, query service, stores, and event sinks.
// Purpose: Execute ingestion runs and read-only queries over an injected store.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The ingestion pipeline and the query service never communicate directly;
//! the injected [`crate::interfaces::LaunchStore`] is their only shared state.
//! Both are single-threaded within one invocation.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod audit;
pub mod ingest;
pub mod query;
pub mod source;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::FileEventSink;
pub use audit::MemoryEventSink;
pub use audit::NoopEventSink;
pub use audit::StderrEventSink;
pub use ingest::IngestError;
pub use ingest::IngestionPipeline;
pub use ingest::Upserter;
pub use query::FilterCriteria;
pub use query::QueryConfig;
pub use query::QueryError;
pub use query::QueryService;
pub use query::ReadFailurePolicy;
pub use source::StaticLaunchSource;
pub use store::InMemoryLaunchStore;
