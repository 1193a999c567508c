// crates/launch-ledger-core/src/runtime/audit.rs
// ============================================================================
// Module: Ledger Event Sinks
// Description: JSON-lines sinks for ingestion and query events.
// Purpose: Emit structured logs without a hard logging framework dependency.
// Dependencies: crate::{core, interfaces}, serde, serde_json
// ============================================================================

//! ## Overview
//! Sinks serialize each event to one JSON line. Write failures are swallowed:
//! logging must never change the outcome of a run or a query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

use crate::core::IngestRecordEvent;
use crate::core::IngestRunEvent;
use crate::core::QueryEvent;
use crate::interfaces::LedgerEventSink;

// ============================================================================
// SECTION: Stderr Sink
// ============================================================================

/// Event sink that logs JSON lines to stderr.
pub struct StderrEventSink;

impl StderrEventSink {
    /// Writes one event line to stderr.
    fn write<T: Serialize>(event: &T) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl LedgerEventSink for StderrEventSink {
    fn record_ingest_run(&self, event: &IngestRunEvent) {
        Self::write(event);
    }

    fn record_ingest_record(&self, event: &IngestRecordEvent) {
        Self::write(event);
    }

    fn record_query(&self, event: &QueryEvent) {
        Self::write(event);
    }
}

// ============================================================================
// SECTION: File Sink
// ============================================================================

/// Event sink that appends JSON lines to a file.
pub struct FileEventSink {
    /// File handle used for append-only logging.
    file: Mutex<File>,
}

impl FileEventSink {
    /// Opens the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends and flushes one event line.
    fn write<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl LedgerEventSink for FileEventSink {
    fn record_ingest_run(&self, event: &IngestRunEvent) {
        self.write(event);
    }

    fn record_ingest_record(&self, event: &IngestRecordEvent) {
        self.write(event);
    }

    fn record_query(&self, event: &QueryEvent) {
        self.write(event);
    }
}

// ============================================================================
// SECTION: No-op and Memory Sinks
// ============================================================================

/// No-op event sink.
pub struct NoopEventSink;

impl LedgerEventSink for NoopEventSink {
    fn record_ingest_run(&self, _event: &IngestRunEvent) {}
}

/// Event sink that keeps serialized events in memory.
#[derive(Default)]
pub struct MemoryEventSink {
    /// Recorded events in emission order.
    events: Mutex<Vec<Value>>,
}

impl MemoryEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded event.
    #[must_use]
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Returns recorded events whose `event` label equals `label`.
    #[must_use]
    pub fn events_named(&self, label: &str) -> Vec<Value> {
        self.events()
            .into_iter()
            .filter(|event| event.get("event").and_then(Value::as_str) == Some(label))
            .collect()
    }

    /// Stores one event.
    fn push<T: Serialize>(&self, event: &T) {
        if let Ok(value) = serde_json::to_value(event)
            && let Ok(mut events) = self.events.lock()
        {
            events.push(value);
        }
    }
}

impl LedgerEventSink for MemoryEventSink {
    fn record_ingest_run(&self, event: &IngestRunEvent) {
        self.push(event);
    }

    fn record_ingest_record(&self, event: &IngestRecordEvent) {
        self.push(event);
    }

    fn record_query(&self, event: &QueryEvent) {
        self.push(event);
    }
}
