// crates/launch-ledger-source/tests/file_source.rs
// ============================================================================
// Module: File Launch Source Tests
// Description: Replay of saved upstream responses from disk.
// Purpose: Ensure file sources share the HTTP source's limits and array rule.
// ============================================================================

//! ## Overview
//! Writes fixtures with `tempfile` and drives them through a full ingestion run.

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

use std::fs;

use launch_ledger_core::InMemoryLaunchStore;
use launch_ledger_core::IngestionPipeline;
use launch_ledger_core::LaunchSource;
use launch_ledger_core::SourceError;
use launch_ledger_source::FileLaunchSource;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn saved_response_ingests_like_upstream() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launches.json");
    let body = json!([
        {
            "id": "5eb87cd9ffd86e000604b32a",
            "name": "FalconSat",
            "date_utc": "2006-03-24T22:30:00.000Z",
            "date_unix": 1_143_239_400,
            "flight_number": 1,
            "success": false,
            "upcoming": false,
            "rocket": { "name": "Falcon 1" }
        },
        { "name": "missing id" }
    ]);
    fs::write(&path, serde_json::to_vec(&body).unwrap()).unwrap();

    let store = InMemoryLaunchStore::new();
    let summary = IngestionPipeline::new(FileLaunchSource::new(&path), store.clone()).run().unwrap();
    assert_eq!(summary.total_processed, 2);
    assert_eq!(summary.successful_upserts, 1);
    assert_eq!(summary.transform_failures, 1);
    assert_eq!(store.records().unwrap()[0].rocket_name, "Falcon 1");
}

#[test]
fn missing_file_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let source = FileLaunchSource::new(dir.path().join("absent.json"));
    assert!(matches!(source.fetch(), Err(SourceError::Unavailable(_))));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launches.json");
    fs::write(&path, "[1, 2, 3, 4, 5, 6]").unwrap();
    let source = FileLaunchSource::new(&path).with_max_bytes(4);
    assert!(
        matches!(source.fetch(), Err(SourceError::Unavailable(ref message)) if message.contains("size limit"))
    );
    assert_eq!(FileLaunchSource::new(&path).fetch().unwrap().len(), 6);
}

#[test]
fn object_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("launches.json");
    fs::write(&path, r#"{"id": "solo"}"#).unwrap();
    assert!(matches!(FileLaunchSource::new(&path).fetch(), Err(SourceError::Unavailable(_))));
}
