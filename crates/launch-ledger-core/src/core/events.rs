// crates/launch-ledger-core/src/core/events.rs
// ============================================================================
// Module: Ledger Events
// Description: Structured log payloads for ingestion runs and queries.
// Purpose: Give every run, per-record failure, and query a JSON-lines record.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Events are serialized one per line by the sinks in
//! [`crate::runtime::audit`]. Each carries a fixed `event` label and an epoch
//! millisecond timestamp taken at construction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::summary::IngestionSummary;
use crate::core::time::unix_millis;

// ============================================================================
// SECTION: Labels
// ============================================================================

/// Outcome of one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestOutcome {
    /// The run fetched and processed the batch.
    Completed,
    /// The fetch failed and nothing was processed.
    Failed,
}

/// Pipeline stage at which a record failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStage {
    /// The transformer rejected the raw object.
    Transform,
    /// The store refused the write.
    Upsert,
}

/// Query operation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOperation {
    /// Paginated listing.
    List,
    /// Lookup by launch id.
    Get,
    /// Filter by status or rocket.
    Filter,
    /// Upcoming shortcut.
    Upcoming,
    /// Mission name search.
    Search,
    /// Recency view.
    Recent,
    /// Aggregate statistics.
    Statistics,
}

/// Query outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The query returned a result.
    Ok,
    /// The lookup found no record.
    NotFound,
    /// A read failed and an empty or zeroed result was returned instead.
    Degraded,
    /// The query failed.
    Error,
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Emitted once per ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestRunEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Run outcome.
    pub outcome: IngestOutcome,
    /// Raw objects processed.
    pub total_processed: usize,
    /// Successful writes.
    pub successful_upserts: usize,
    /// Failed records.
    pub failed_upserts: usize,
    /// Fetch failure message.
    pub error: Option<String>,
}

impl IngestRunEvent {
    /// Builds a completed-run event from its summary.
    #[must_use]
    pub fn completed(summary: &IngestionSummary) -> Self {
        Self {
            event: "ingest_run",
            timestamp_ms: unix_millis(),
            outcome: IngestOutcome::Completed,
            total_processed: summary.total_processed,
            successful_upserts: summary.successful_upserts,
            failed_upserts: summary.failed_upserts,
            error: None,
        }
    }

    /// Builds a failed-run event.
    #[must_use]
    pub fn failed(error: String) -> Self {
        Self {
            event: "ingest_run",
            timestamp_ms: unix_millis(),
            outcome: IngestOutcome::Failed,
            total_processed: 0,
            successful_upserts: 0,
            failed_upserts: 0,
            error: Some(error),
        }
    }
}

/// Emitted for each record that failed during a run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestRecordEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Zero-based position in the upstream list.
    pub position: usize,
    /// Upstream id when it could be read.
    pub launch_id: Option<String>,
    /// Failing stage.
    pub stage: IngestStage,
    /// Failure message.
    pub error: String,
}

impl IngestRecordEvent {
    /// Creates a per-record failure event.
    #[must_use]
    pub fn new(position: usize, launch_id: Option<String>, stage: IngestStage, error: String) -> Self {
        Self {
            event: "ingest_record",
            timestamp_ms: unix_millis(),
            position,
            launch_id,
            stage,
            error,
        }
    }
}

/// Emitted once per query operation.
#[derive(Debug, Clone, Serialize)]
pub struct QueryEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Operation label.
    pub operation: QueryOperation,
    /// Outcome label.
    pub outcome: QueryOutcome,
    /// Items returned.
    pub item_count: usize,
    /// Records examined.
    pub scanned_count: usize,
    /// Normalized error kind label.
    pub error_kind: Option<&'static str>,
}

impl QueryEvent {
    /// Creates a query event.
    #[must_use]
    pub fn new(
        operation: QueryOperation,
        outcome: QueryOutcome,
        item_count: usize,
        scanned_count: usize,
        error_kind: Option<&'static str>,
    ) -> Self {
        Self {
            event: "query",
            timestamp_ms: unix_millis(),
            operation,
            outcome,
            item_count,
            scanned_count,
            error_kind,
        }
    }
}
