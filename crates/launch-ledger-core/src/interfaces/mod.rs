// crates/launch-ledger-core/src/interfaces/mod.rs
// ============================================================================
// Module: Launch Ledger Interfaces
// Description: Backend-agnostic interfaces for storage, upstream, and events.
// Purpose: Define the contract surfaces used by the ingestion and query runtime.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The runtime never talks to a concrete database or network client. Stores,
//! sources, and event sinks are injected through these traits by the process
//! bootstrap. Store implementations must order scans by
//! (`launch_id`, `launch_date`) and fail closed on cursors they did not mint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::CursorError;
use crate::core::IngestRecordEvent;
use crate::core::IngestRunEvent;
use crate::core::LaunchId;
use crate::core::LaunchRecord;
use crate::core::LaunchStatus;
use crate::core::PaginationCursor;
use crate::core::QueryEvent;

// ============================================================================
// SECTION: Scan Types
// ============================================================================

/// Store-side predicate applied to examined records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanFilter {
    /// Matches records with this status.
    Status(LaunchStatus),
    /// Matches records whose rocket name equals this value exactly.
    Rocket(String),
}

impl ScanFilter {
    /// Returns true when the record satisfies the predicate.
    #[must_use]
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            Self::Status(status) => record.status == *status,
            Self::Rocket(rocket) => record.rocket_name == *rocket,
        }
    }
}

/// One bounded scan request.
///
/// # Invariants
/// - `limit` bounds the records examined, not the records returned; the filter
///   is applied after examination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// Maximum records to examine.
    pub limit: usize,
    /// Optional predicate.
    pub filter: Option<ScanFilter>,
    /// Resume strictly after the key this cursor names.
    pub cursor: Option<PaginationCursor>,
}

impl ScanRequest {
    /// Creates an unfiltered scan from the start of the table.
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            filter: None,
            cursor: None,
        }
    }

    /// Sets the predicate.
    #[must_use]
    pub fn with_filter(mut self, filter: Option<ScanFilter>) -> Self {
        self.filter = filter;
        self
    }

    /// Sets the continuation cursor.
    #[must_use]
    pub fn with_cursor(mut self, cursor: Option<PaginationCursor>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of scan results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Examined records that matched the filter, in key order.
    pub items: Vec<LaunchRecord>,
    /// Cursor after the last examined record; `None` once the table is exhausted.
    pub next_cursor: Option<PaginationCursor>,
    /// Records examined.
    pub scanned_count: usize,
}

// ============================================================================
// SECTION: Launch Store
// ============================================================================

/// Launch store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("launch store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("launch store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("launch store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("launch store invalid data: {0}")]
    Invalid(String),
    /// The continuation cursor was rejected.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    /// Store reported an error.
    #[error("launch store error: {0}")]
    Store(String),
}

impl From<CursorError> for StoreError {
    fn from(error: CursorError) -> Self {
        Self::InvalidCursor(error.to_string())
    }
}

/// Partitioned key-value store holding launch records.
pub trait LaunchStore {
    /// Writes a record, overwriting any record with the same composite key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn put(&self, record: &LaunchRecord) -> Result<(), StoreError>;

    /// Returns up to `limit` records under one partition key, ordered by
    /// `launch_date` ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the read fails.
    fn query_partition(
        &self,
        launch_id: &LaunchId,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, StoreError>;

    /// Examines up to `request.limit` records after the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidCursor`] for a cursor the store did not
    /// mint and [`StoreError`] when the read fails.
    fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError>;

    /// Reports store readiness.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store is unavailable.
    fn readiness(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================================
// SECTION: Launch Source
// ============================================================================

/// Upstream fetch errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The upstream call failed or returned a failure status.
    #[error("launch source unavailable: {0}")]
    Unavailable(String),
    /// The upstream configuration or response shape is invalid.
    #[error("launch source invalid: {0}")]
    Invalid(String),
}

/// Upstream source of raw launch objects.
pub trait LaunchSource {
    /// Fetches the full current list of raw launch objects in upstream order.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the fetch fails; no partial result exists.
    fn fetch(&self) -> Result<Vec<Value>, SourceError>;
}

// ============================================================================
// SECTION: Event Sink
// ============================================================================

/// Sink for structured ledger events.
pub trait LedgerEventSink: Send + Sync {
    /// Record an ingestion run event.
    fn record_ingest_run(&self, event: &IngestRunEvent);

    /// Record a per-record ingestion failure.
    fn record_ingest_record(&self, _event: &IngestRecordEvent) {}

    /// Record a query event.
    fn record_query(&self, _event: &QueryEvent) {}
}
