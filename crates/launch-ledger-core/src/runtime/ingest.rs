// crates/launch-ledger-core/src/runtime/ingest.rs
// ============================================================================
// Module: Ingestion Pipeline
// Description: Fetch, transform, and upsert one batch of upstream launches.
// Purpose: Persist the current upstream state idempotently with per-record accounting.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! A run fetches the whole upstream list once, then transforms and writes each
//! object in upstream order. Only the fetch is fatal. Transform and write
//! failures are counted, logged as `ingest_record` events, and skipped.
//! Re-running with identical upstream data yields identical stored state
//! apart from `last_updated`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::IngestRecordEvent;
use crate::core::IngestRunEvent;
use crate::core::IngestStage;
use crate::core::IngestionSummary;
use crate::core::LaunchRecord;
use crate::core::time::now_rfc3339;
use crate::core::transform::raw_launch_id;
use crate::core::transform_launch;
use crate::interfaces::LaunchSource;
use crate::interfaces::LaunchStore;
use crate::interfaces::LedgerEventSink;
use crate::interfaces::StoreError;
use crate::runtime::audit::NoopEventSink;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors that abort an ingestion run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upstream fetch failed; nothing was processed.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

// ============================================================================
// SECTION: Upserter
// ============================================================================

/// Writes records unconditionally; last writer wins.
pub struct Upserter<S> {
    /// Destination store.
    store: S,
}

impl<S: LaunchStore> Upserter<S> {
    /// Creates an upserter over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Writes one record, exposing the store error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the store rejects the write.
    pub fn try_upsert(&self, record: &LaunchRecord) -> Result<(), StoreError> {
        self.store.put(record)
    }

    /// Writes one record and reports whether it succeeded.
    #[must_use]
    pub fn upsert(&self, record: &LaunchRecord) -> bool {
        self.try_upsert(record).is_ok()
    }
}

// ============================================================================
// SECTION: Pipeline
// ============================================================================

/// Orchestrates fetch, transform, and upsert for one batch.
pub struct IngestionPipeline<F, S> {
    /// Upstream source.
    source: F,
    /// Record writer.
    upserter: Upserter<S>,
    /// Event sink for run and per-record events.
    events: Arc<dyn LedgerEventSink>,
}

impl<F: LaunchSource, S: LaunchStore> IngestionPipeline<F, S> {
    /// Creates a pipeline that discards events.
    #[must_use]
    pub fn new(source: F, store: S) -> Self {
        Self {
            source,
            upserter: Upserter::new(store),
            events: Arc::new(NoopEventSink),
        }
    }

    /// Routes run and per-record events to `events`.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn LedgerEventSink>) -> Self {
        self.events = events;
        self
    }

    /// Executes one ingestion run.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::UpstreamUnavailable`] when the fetch fails.
    pub fn run(&self) -> Result<IngestionSummary, IngestError> {
        let started_at = now_rfc3339();
        let launches = match self.source.fetch() {
            Ok(launches) => launches,
            Err(err) => {
                let message = err.to_string();
                self.events.record_ingest_run(&IngestRunEvent::failed(message.clone()));
                return Err(IngestError::UpstreamUnavailable(message));
            }
        };

        let mut successful_upserts = 0;
        let mut transform_failures = 0;
        let mut upsert_failures = 0;
        for (position, raw) in launches.iter().enumerate() {
            let record = match transform_launch(raw, &now_rfc3339()) {
                Ok(record) => record,
                Err(err) => {
                    transform_failures += 1;
                    self.events.record_ingest_record(&IngestRecordEvent::new(
                        position,
                        raw_launch_id(raw),
                        IngestStage::Transform,
                        err.to_string(),
                    ));
                    continue;
                }
            };
            match self.upserter.try_upsert(&record) {
                Ok(()) => successful_upserts += 1,
                Err(err) => {
                    upsert_failures += 1;
                    self.events.record_ingest_record(&IngestRecordEvent::new(
                        position,
                        Some(record.launch_id.to_string()),
                        IngestStage::Upsert,
                        err.to_string(),
                    ));
                }
            }
        }

        let summary = IngestionSummary {
            total_processed: launches.len(),
            successful_upserts,
            failed_upserts: transform_failures + upsert_failures,
            transform_failures,
            upsert_failures,
            started_at,
            finished_at: now_rfc3339(),
        };
        self.events.record_ingest_run(&IngestRunEvent::completed(&summary));
        Ok(summary)
    }
}
