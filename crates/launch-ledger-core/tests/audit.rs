// crates/launch-ledger-core/tests/audit.rs
// ============================================================================
// Module: Event Sink Tests
// Description: JSON-lines output of the file and memory sinks.
// Purpose: Ensure events serialize with stable labels and append per line.
// Dependencies: launch-ledger-core, tempfile
// ============================================================================

//! ## Overview
//! Runs real ingestion and query calls against file and memory sinks.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use std::sync::Arc;

use common::raw_launch;
use launch_ledger_core::FileEventSink;
use launch_ledger_core::InMemoryLaunchStore;
use launch_ledger_core::IngestionPipeline;
use launch_ledger_core::LaunchId;
use launch_ledger_core::MemoryEventSink;
use launch_ledger_core::QueryConfig;
use launch_ledger_core::QueryService;
use launch_ledger_core::StaticLaunchSource;
use serde_json::Value;
use serde_json::json;

#[test]
fn file_sink_appends_one_json_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.log");
    let sink = Arc::new(FileEventSink::new(&path).unwrap());
    let store = InMemoryLaunchStore::new();
    let source = StaticLaunchSource::new(vec![
        raw_launch("a1", "2020-01-01T00:00:00.000Z", "Alpha", Some(true), false, "F9"),
        json!(42),
    ]);
    IngestionPipeline::new(source, store.clone()).with_event_sink(sink.clone()).run().unwrap();
    QueryService::new(store, QueryConfig::default())
        .with_event_sink(sink)
        .get(&LaunchId::new("a1"))
        .unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["event"], json!("ingest_record"));
    assert_eq!(lines[0]["stage"], json!("transform"));
    assert_eq!(lines[0]["launch_id"], Value::Null);
    assert_eq!(lines[1]["event"], json!("ingest_run"));
    assert_eq!(lines[1]["total_processed"], json!(2));
    assert_eq!(lines[2]["event"], json!("query"));
    assert_eq!(lines[2]["operation"], json!("get"));
    assert!(lines.iter().all(|line| line["timestamp_ms"].as_u64().is_some()));
}

#[test]
fn memory_sink_records_not_found_lookups() {
    let events = Arc::new(MemoryEventSink::new());
    let service = QueryService::new(InMemoryLaunchStore::new(), QueryConfig::default())
        .with_event_sink(events.clone());
    assert!(service.get(&LaunchId::new("nope")).unwrap().is_none());
    let recorded = events.events();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0]["outcome"], json!("not_found"));
    assert_eq!(recorded[0]["error_kind"], Value::Null);
}
