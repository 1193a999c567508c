// crates/launch-ledger-core/src/runtime/query.rs
// ============================================================================
// Module: Query Service
// Description: Listing, lookup, filter, search, recency, and statistics.
// Purpose: Serve read-only views over an unindexed partitioned store.
// Dependencies: crate::{core, interfaces}, serde, thiserror
// ============================================================================

//! ## Overview
//! Every operation is a bounded scan, optionally filtered store-side. Limits
//! are clamped to `[1, 100]` regardless of what callers request, and every
//! multi-item result reports how many records were examined.
//!
//! Read failures propagate by default. Under [`ReadFailurePolicy::Degrade`]
//! lookups report not-found, item queries return an empty page, and statistics
//! return a zeroed snapshot carrying the message; listing always propagates.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::LaunchId;
use crate::core::LaunchRecord;
use crate::core::LaunchStatus;
use crate::core::ListPage;
use crate::core::PaginationCursor;
use crate::core::QueryEvent;
use crate::core::QueryOperation;
use crate::core::QueryOutcome;
use crate::core::QueryPage;
use crate::core::StatisticsSnapshot;
use crate::core::StatisticsTally;
use crate::core::time::now_rfc3339;
use crate::interfaces::LaunchStore;
use crate::interfaces::LedgerEventSink;
use crate::interfaces::ScanFilter;
use crate::interfaces::ScanRequest;
use crate::interfaces::StoreError;
use crate::runtime::audit::NoopEventSink;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Hard maximum for any page size or item limit.
pub const HARD_MAX_PAGE_SIZE: usize = 100;
/// Default listing page size.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Default filter limit.
pub const DEFAULT_FILTER_LIMIT: usize = 50;
/// Default upcoming limit.
pub const DEFAULT_UPCOMING_LIMIT: usize = 10;
/// Default search limit.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Default recency limit.
pub const DEFAULT_RECENT_LIMIT: usize = 10;
/// Default records examined per filter or search batch.
pub const DEFAULT_SEARCH_BATCH_SIZE: usize = 50;
/// Default recency over-fetch multiplier.
pub const DEFAULT_RECENT_OVERFETCH: usize = 3;
/// Default statistics sample cap.
pub const STATISTICS_SAMPLE_CAP: usize = 1000;
/// Default statistics page size.
pub const STATISTICS_PAGE_SIZE: usize = 100;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Behavior when a store read fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadFailurePolicy {
    /// Surface the failure to the caller.
    #[default]
    Propagate,
    /// Return an empty or zeroed result and log a degraded event.
    Degrade,
}

/// Query service tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryConfig {
    /// Listing page size when the caller passes none.
    pub default_page_size: usize,
    /// Upper bound for page sizes and limits; never above [`HARD_MAX_PAGE_SIZE`].
    pub max_page_size: usize,
    /// Records examined per filter or search batch.
    pub search_batch_size: usize,
    /// Recency over-fetch multiplier.
    pub recent_overfetch: usize,
    /// Maximum records sampled for statistics.
    pub stats_sample_cap: usize,
    /// Records examined per statistics page.
    pub stats_page_size: usize,
    /// Read failure policy.
    pub on_read_error: ReadFailurePolicy,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: HARD_MAX_PAGE_SIZE,
            search_batch_size: DEFAULT_SEARCH_BATCH_SIZE,
            recent_overfetch: DEFAULT_RECENT_OVERFETCH,
            stats_sample_cap: STATISTICS_SAMPLE_CAP,
            stats_page_size: STATISTICS_PAGE_SIZE,
            on_read_error: ReadFailurePolicy::Propagate,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Query failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The continuation cursor is corrupted or foreign.
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    /// Filter called without a status or rocket.
    #[error("filter requires a status or a rocket")]
    MissingFilterCriteria,
    /// Filter called with both a status and a rocket.
    #[error("filter accepts a status or a rocket, not both")]
    ConflictingFilterCriteria,
    /// Search called with an empty query.
    #[error("search query is required")]
    MissingSearchQuery,
    /// The store read failed.
    #[error("store read failed: {0}")]
    StoreRead(String),
}

impl QueryError {
    /// Returns a stable label for logs and exit-code mapping.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCursor(_) => "invalid_cursor",
            Self::MissingFilterCriteria => "missing_filter_criteria",
            Self::ConflictingFilterCriteria => "conflicting_filter_criteria",
            Self::MissingSearchQuery => "missing_search_query",
            Self::StoreRead(_) => "store_read",
        }
    }
}

impl From<StoreError> for QueryError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::InvalidCursor(message) => Self::InvalidCursor(message),
            other => Self::StoreRead(other.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Filter Criteria
// ============================================================================

/// Caller-supplied filter criteria; exactly one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Status to match.
    pub status: Option<LaunchStatus>,
    /// Rocket name to match exactly; blank values count as absent.
    pub rocket: Option<String>,
}

impl FilterCriteria {
    /// Criteria matching one status.
    #[must_use]
    pub const fn status(status: LaunchStatus) -> Self {
        Self {
            status: Some(status),
            rocket: None,
        }
    }

    /// Criteria matching one rocket name.
    #[must_use]
    pub fn rocket(rocket: impl Into<String>) -> Self {
        Self {
            status: None,
            rocket: Some(rocket.into()),
        }
    }

    /// Resolves the criteria into a store-side predicate.
    fn to_scan_filter(&self) -> Result<ScanFilter, QueryError> {
        let rocket = self.rocket.as_deref().map(str::trim).filter(|rocket| !rocket.is_empty());
        match (self.status, rocket) {
            (None, None) => Err(QueryError::MissingFilterCriteria),
            (Some(_), Some(_)) => Err(QueryError::ConflictingFilterCriteria),
            (Some(status), None) => Ok(ScanFilter::Status(status)),
            (None, Some(rocket)) => Ok(ScanFilter::Rocket(rocket.to_string())),
        }
    }
}

// ============================================================================
// SECTION: Query Service
// ============================================================================

/// Read-only query service over an injected store.
pub struct QueryService<S> {
    /// Backing store.
    store: S,
    /// Tuning.
    config: QueryConfig,
    /// Event sink for query events.
    events: Arc<dyn LedgerEventSink>,
}

impl<S: LaunchStore> QueryService<S> {
    /// Creates a query service that discards events.
    #[must_use]
    pub fn new(store: S, config: QueryConfig) -> Self {
        Self {
            store,
            config,
            events: Arc::new(NoopEventSink),
        }
    }

    /// Routes query events to `events`.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn LedgerEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Lists one page of records in key order.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCursor`] for a cursor this store did not
    /// mint and [`QueryError::StoreRead`] when the scan fails. Listing ignores
    /// the degrade policy.
    pub fn list(
        &self,
        page_size: Option<usize>,
        cursor: Option<&PaginationCursor>,
    ) -> Result<ListPage, QueryError> {
        let limit = self.clamp(page_size, self.config.default_page_size);
        let request = ScanRequest::new(limit).with_cursor(cursor.cloned());
        let result = self.store.scan(&request).map_err(QueryError::from).map(|page| ListPage {
            count: page.items.len(),
            items: page.items,
            next_cursor: page.next_cursor,
            scanned_count: page.scanned_count,
        });
        match &result {
            Ok(page) => {
                self.emit(QueryOperation::List, QueryOutcome::Ok, page.count, page.scanned_count);
            }
            Err(err) => self.emit_error(QueryOperation::List, err),
        }
        result
    }

    /// Returns the first record stored under `launch_id`.
    ///
    /// Partitions are ordered by `launch_date` ascending, so this is the
    /// earliest date recorded for the id.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::StoreRead`] when the read fails under the
    /// propagate policy.
    pub fn get(&self, launch_id: &LaunchId) -> Result<Option<LaunchRecord>, QueryError> {
        match self.store.query_partition(launch_id, 1) {
            Ok(records) => {
                let scanned = records.len();
                let record = records.into_iter().next();
                let outcome =
                    if record.is_some() { QueryOutcome::Ok } else { QueryOutcome::NotFound };
                self.emit(QueryOperation::Get, outcome, usize::from(record.is_some()), scanned);
                Ok(record)
            }
            Err(err) => self.degrade(QueryOperation::Get, err.into(), || None),
        }
    }

    /// Returns up to `limit` records matching exactly one criterion.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingFilterCriteria`] or
    /// [`QueryError::ConflictingFilterCriteria`] for invalid criteria and
    /// [`QueryError::StoreRead`] when a scan fails under the propagate policy.
    pub fn filter(
        &self,
        criteria: &FilterCriteria,
        limit: Option<usize>,
    ) -> Result<QueryPage, QueryError> {
        let filter = match criteria.to_scan_filter() {
            Ok(filter) => filter,
            Err(err) => {
                self.emit_error(QueryOperation::Filter, &err);
                return Err(err);
            }
        };
        let limit = self.clamp(limit, DEFAULT_FILTER_LIMIT);
        self.filtered_page(QueryOperation::Filter, filter, limit)
    }

    /// Returns up to `limit` upcoming launches.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::StoreRead`] when a scan fails under the propagate
    /// policy.
    pub fn upcoming(&self, limit: Option<usize>) -> Result<QueryPage, QueryError> {
        let limit = self.clamp(limit, DEFAULT_UPCOMING_LIMIT);
        let filter = ScanFilter::Status(LaunchStatus::Upcoming);
        self.filtered_page(QueryOperation::Upcoming, filter, limit)
    }

    /// Returns up to `limit` records whose mission name contains `query`,
    /// compared case-insensitively, in scan order. Surrounding whitespace is
    /// part of the needle; only an all-blank query is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingSearchQuery`] for a blank query and
    /// [`QueryError::StoreRead`] when a scan fails under the propagate policy.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<QueryPage, QueryError> {
        if query.trim().is_empty() {
            let err = QueryError::MissingSearchQuery;
            self.emit_error(QueryOperation::Search, &err);
            return Err(err);
        }
        let needle = query.to_lowercase();
        let limit = self.clamp(limit, DEFAULT_SEARCH_LIMIT);
        let matches = |record: &LaunchRecord| record.mission_name.to_lowercase().contains(&needle);
        match self.collect_matching(None, limit, matches) {
            Ok(page) => {
                self.emit(QueryOperation::Search, QueryOutcome::Ok, page.count, page.scanned_count);
                Ok(page)
            }
            Err(err) => self.degrade(QueryOperation::Search, err, QueryPage::empty),
        }
    }

    /// Returns up to `limit` records sorted by `launch_date` descending.
    ///
    /// The result is drawn from one over-fetched scan, not the whole table,
    /// so it is not guaranteed to hold the globally most recent launches.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::StoreRead`] when the scan fails under the
    /// propagate policy.
    pub fn recent(&self, limit: Option<usize>) -> Result<QueryPage, QueryError> {
        let limit = self.clamp(limit, DEFAULT_RECENT_LIMIT);
        let fetch = limit.saturating_mul(self.config.recent_overfetch.max(1));
        match self.store.scan(&ScanRequest::new(fetch)) {
            Ok(page) => {
                let mut items = page.items;
                items.sort_by(|left, right| right.launch_date.cmp(&left.launch_date));
                items.truncate(limit);
                let page = QueryPage::new(items, page.scanned_count);
                self.emit(QueryOperation::Recent, QueryOutcome::Ok, page.count, page.scanned_count);
                Ok(page)
            }
            Err(err) => self.degrade(QueryOperation::Recent, err.into(), QueryPage::empty),
        }
    }

    /// Computes aggregate statistics over a bounded sample.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::StoreRead`] when a scan fails under the propagate
    /// policy.
    pub fn statistics(&self) -> Result<StatisticsSnapshot, QueryError> {
        let cap = self.config.stats_sample_cap.max(1);
        match self.sample_statistics(cap) {
            Ok(snapshot) => {
                self.emit(
                    QueryOperation::Statistics,
                    QueryOutcome::Ok,
                    snapshot.sample_size,
                    snapshot.scanned_count,
                );
                Ok(snapshot)
            }
            Err(err) => {
                let message = err.to_string();
                self.degrade(QueryOperation::Statistics, err, || {
                    StatisticsSnapshot::zeroed(cap, now_rfc3339(), message)
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    /// Clamps a caller limit to `[1, max_page_size]`.
    fn clamp(&self, requested: Option<usize>, default: usize) -> usize {
        let max = self.config.max_page_size.clamp(1, HARD_MAX_PAGE_SIZE);
        requested.unwrap_or(default).clamp(1, max)
    }

    /// Runs a store-side filtered collection with logging and degradation.
    fn filtered_page(
        &self,
        operation: QueryOperation,
        filter: ScanFilter,
        limit: usize,
    ) -> Result<QueryPage, QueryError> {
        match self.collect_matching(Some(filter), limit, |_| true) {
            Ok(page) => {
                self.emit(operation, QueryOutcome::Ok, page.count, page.scanned_count);
                Ok(page)
            }
            Err(err) => self.degrade(operation, err, QueryPage::empty),
        }
    }

    /// Scans batches until `limit` records satisfy `predicate` or the store
    /// is exhausted.
    fn collect_matching(
        &self,
        filter: Option<ScanFilter>,
        limit: usize,
        predicate: impl Fn(&LaunchRecord) -> bool,
    ) -> Result<QueryPage, QueryError> {
        let batch = self.config.search_batch_size.max(1);
        let mut items = Vec::new();
        let mut scanned_count = 0;
        let mut cursor = None;
        loop {
            let request = ScanRequest::new(batch).with_filter(filter.clone()).with_cursor(cursor);
            let page = self.store.scan(&request)?;
            scanned_count += page.scanned_count;
            for record in page.items {
                if predicate(&record) {
                    items.push(record);
                    if items.len() == limit {
                        return Ok(QueryPage::new(items, scanned_count));
                    }
                }
            }
            match page.next_cursor {
                Some(next) if page.scanned_count > 0 => cursor = Some(next),
                _ => break,
            }
        }
        Ok(QueryPage::new(items, scanned_count))
    }

    /// Tallies up to `cap` records across successive pages.
    fn sample_statistics(&self, cap: usize) -> Result<StatisticsSnapshot, QueryError> {
        let page_size = self.config.stats_page_size.max(1);
        let mut tally = StatisticsTally::default();
        let mut cursor = None;
        let mut exhaustive = false;
        loop {
            let remaining = cap.saturating_sub(tally.total());
            if remaining == 0 {
                break;
            }
            let request = ScanRequest::new(page_size.min(remaining)).with_cursor(cursor);
            let page = self.store.scan(&request)?;
            for record in &page.items {
                tally.observe(record);
            }
            match page.next_cursor {
                None => {
                    exhaustive = true;
                    break;
                }
                Some(_) if page.items.is_empty() => break,
                Some(next) => cursor = Some(next),
            }
        }
        Ok(tally.finish(cap, exhaustive, now_rfc3339()))
    }

    /// Applies the read failure policy to a failed read.
    fn degrade<T>(
        &self,
        operation: QueryOperation,
        error: QueryError,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, QueryError> {
        if self.config.on_read_error == ReadFailurePolicy::Degrade
            && matches!(error, QueryError::StoreRead(_))
        {
            self.events.record_query(&QueryEvent::new(
                operation,
                QueryOutcome::Degraded,
                0,
                0,
                Some(error.kind()),
            ));
            return Ok(fallback());
        }
        self.emit_error(operation, &error);
        Err(error)
    }

    /// Records a query event.
    fn emit(&self, operation: QueryOperation, outcome: QueryOutcome, items: usize, scanned: usize) {
        self.events.record_query(&QueryEvent::new(operation, outcome, items, scanned, None));
    }

    /// Records a failed query event.
    fn emit_error(&self, operation: QueryOperation, error: &QueryError) {
        self.events.record_query(&QueryEvent::new(
            operation,
            QueryOutcome::Error,
            0,
            0,
            Some(error.kind()),
        ));
    }
}
