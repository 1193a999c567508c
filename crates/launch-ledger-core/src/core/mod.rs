// crates/launch-ledger-core/src/core/mod.rs
// ============================================================================
// Module: Launch Ledger Core Types
// Description: Records, cursors, raw upstream shapes, and derived summaries.
// Purpose: Group the data model shared by ingestion and queries.
// Dependencies: bigdecimal, serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types are plain data: they carry no store handles and perform no I/O.
//! The transformer is the only place where untrusted upstream objects become
//! [`LaunchRecord`] values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod cursor;
pub mod decimal;
pub mod events;
pub mod raw;
pub mod record;
pub mod summary;
pub mod time;
pub mod transform;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cursor::CursorError;
pub use cursor::PaginationCursor;
pub use cursor::decode_cursor;
pub use cursor::encode_cursor;
pub use decimal::ExactDecimal;
pub use events::IngestOutcome;
pub use events::IngestRecordEvent;
pub use events::IngestRunEvent;
pub use events::IngestStage;
pub use events::QueryEvent;
pub use events::QueryOperation;
pub use events::QueryOutcome;
pub use raw::RawLaunch;
pub use record::LaunchDate;
pub use record::LaunchId;
pub use record::LaunchRecord;
pub use record::LaunchStatus;
pub use record::ParseStatusError;
pub use record::RecordKey;
pub use summary::IngestionSummary;
pub use summary::ListPage;
pub use summary::QueryPage;
pub use summary::StatisticsSnapshot;
pub use summary::StatisticsTally;
pub use transform::TransformError;
pub use transform::transform_launch;
