// crates/launch-ledger-core/src/core/summary.rs
// ============================================================================
// Module: Run and Query Summaries
// Description: Ingestion counts, query pages, and statistics snapshots.
// Purpose: Define the derived, never-persisted result shapes.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! These types are returned to callers and rendered as JSON by the CLI. None
//! of them is ever written back to the store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::cursor::PaginationCursor;
use crate::core::record::LaunchRecord;
use crate::core::record::LaunchStatus;

// ============================================================================
// SECTION: Ingestion Summary
// ============================================================================

/// Counts produced by one ingestion run.
///
/// # Invariants
/// - `total_processed == successful_upserts + failed_upserts`.
/// - `failed_upserts == transform_failures + upsert_failures`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionSummary {
    /// Raw objects fetched and processed.
    pub total_processed: usize,
    /// Records written successfully.
    pub successful_upserts: usize,
    /// Records that failed to transform or write.
    pub failed_upserts: usize,
    /// Objects the transformer rejected.
    pub transform_failures: usize,
    /// Records the store refused.
    pub upsert_failures: usize,
    /// RFC 3339 start time.
    pub started_at: String,
    /// RFC 3339 finish time.
    pub finished_at: String,
}

// ============================================================================
// SECTION: Query Pages
// ============================================================================

/// Multi-item query result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPage {
    /// Matching records.
    pub items: Vec<LaunchRecord>,
    /// Number of returned items.
    pub count: usize,
    /// Records examined to produce the result.
    pub scanned_count: usize,
}

impl QueryPage {
    /// Builds a page, deriving `count` from `items`.
    #[must_use]
    pub fn new(items: Vec<LaunchRecord>, scanned_count: usize) -> Self {
        let count = items.len();
        Self {
            items,
            count,
            scanned_count,
        }
    }

    /// Returns an empty page.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Paginated listing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage {
    /// Records in scan order.
    pub items: Vec<LaunchRecord>,
    /// Continuation token, present only when more records remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<PaginationCursor>,
    /// Number of returned items.
    pub count: usize,
    /// Records examined.
    pub scanned_count: usize,
}

// ============================================================================
// SECTION: Statistics
// ============================================================================

/// Aggregate statistics over a bounded sample of the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// Records in the sample.
    pub total: usize,
    /// Successful launches.
    pub successful: usize,
    /// Failed launches.
    pub failed: usize,
    /// Upcoming launches.
    pub upcoming: usize,
    /// Launches with unknown outcome.
    pub unknown: usize,
    /// Success percentage over completed launches, two decimals.
    pub success_rate: f64,
    /// Launch count per rocket name.
    pub rockets: BTreeMap<String, usize>,
    /// Records sampled.
    pub sample_size: usize,
    /// Maximum sample size.
    pub sample_cap: usize,
    /// True when the scan reached the end of the store.
    pub exhaustive: bool,
    /// Records examined.
    pub scanned_count: usize,
    /// RFC 3339 computation time.
    pub computed_at: String,
    /// Read failure message, set only in degraded mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatisticsSnapshot {
    /// Returns a zeroed snapshot carrying a read failure message.
    #[must_use]
    pub fn zeroed(sample_cap: usize, computed_at: String, error: String) -> Self {
        StatisticsTally::default().finish(sample_cap, false, computed_at).with_error(error)
    }

    /// Attaches an error message.
    #[must_use]
    fn with_error(mut self, error: String) -> Self {
        self.error = Some(error);
        self
    }
}

/// Running counts accumulated while scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatisticsTally {
    /// Successful launches.
    successful: usize,
    /// Failed launches.
    failed: usize,
    /// Upcoming launches.
    upcoming: usize,
    /// Unknown outcomes.
    unknown: usize,
    /// Launch count per rocket name.
    rockets: BTreeMap<String, usize>,
}

impl StatisticsTally {
    /// Adds one record to the tally.
    pub fn observe(&mut self, record: &LaunchRecord) {
        match record.status {
            LaunchStatus::Success => self.successful += 1,
            LaunchStatus::Failed => self.failed += 1,
            LaunchStatus::Upcoming => self.upcoming += 1,
            LaunchStatus::Unknown => self.unknown += 1,
        }
        *self.rockets.entry(record.rocket_name.clone()).or_insert(0) += 1;
    }

    /// Returns the number of observed records.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.successful + self.failed + self.upcoming + self.unknown
    }

    /// Converts the tally into a snapshot.
    #[must_use]
    pub fn finish(
        self,
        sample_cap: usize,
        exhaustive: bool,
        computed_at: String,
    ) -> StatisticsSnapshot {
        let total = self.total();
        StatisticsSnapshot {
            total,
            successful: self.successful,
            failed: self.failed,
            upcoming: self.upcoming,
            unknown: self.unknown,
            success_rate: success_rate(self.successful, total - self.upcoming),
            rockets: self.rockets,
            sample_size: total,
            sample_cap,
            exhaustive,
            scanned_count: total,
            computed_at,
            error: None,
        }
    }
}

/// Computes `successful / completed * 100` rounded to two decimals.
#[allow(clippy::cast_precision_loss, reason = "Sample counts are capped far below 2^52.")]
fn success_rate(successful: usize, completed: usize) -> f64 {
    if completed == 0 {
        return 0.0;
    }
    let rate = successful as f64 / completed as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

// ============================================================================
// SECTION: Tests
// ============================================================================
