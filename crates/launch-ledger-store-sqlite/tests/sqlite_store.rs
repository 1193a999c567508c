// crates/launch-ledger-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Launch Store Tests
// Description: Upsert, keyset scan, and integrity tests for the SQLite store.
// Purpose: Validate path safety, schema versioning, pagination, and
//          fail-closed reads of tampered rows.
// ============================================================================

//! ## Overview
//! Exercises [`SqliteLaunchStore`] directly and through [`QueryService`]:
//! - Upserts overwrite by composite key and persist across reopen
//! - Scans examine `limit` rows, filter afterwards, and resume by cursor
//! - Tampered payloads and unknown schema versions fail closed
//! - Path safety checks reject directories and empty paths

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

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use launch_ledger_core::LaunchId;
use launch_ledger_core::LaunchRecord;
use launch_ledger_core::LaunchStatus;
use launch_ledger_core::LaunchStore;
use launch_ledger_core::PaginationCursor;
use launch_ledger_core::QueryConfig;
use launch_ledger_core::QueryService;
use launch_ledger_core::ScanFilter;
use launch_ledger_core::ScanRequest;
use launch_ledger_core::StoreError;
use launch_ledger_core::transform_launch;
use launch_ledger_store_sqlite::MAX_RECORD_BYTES;
use launch_ledger_store_sqlite::SqliteLaunchStore;
use launch_ledger_store_sqlite::SqliteStoreConfig;
use launch_ledger_store_sqlite::SqliteStoreError;
use launch_ledger_store_sqlite::SqliteStoreMode;
use launch_ledger_store_sqlite::SqliteSyncMode;
use proptest::prelude::*;
use rusqlite::Connection;
use rusqlite::params;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn config_for_path(path: &Path) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: path.to_path_buf(),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    }
}

fn open(dir: &TempDir) -> SqliteLaunchStore {
    SqliteLaunchStore::new(&config_for_path(&dir.path().join("ledger.db"))).unwrap()
}

fn record(id: &str, date: &str, upcoming: bool, rocket: &str) -> LaunchRecord {
    let raw = json!({
        "id": id,
        "date_utc": date,
        "name": format!("Mission {id}"),
        "success": if upcoming { serde_json::Value::Null } else { json!(true) },
        "upcoming": upcoming,
        "flight_number": 3,
        "date_unix": 1_600_000_000_u64,
        "rocket": { "name": rocket }
    });
    transform_launch(&raw, "2024-05-01T12:00:00Z").unwrap()
}

fn seed(store: &SqliteLaunchStore, count: usize) -> Vec<LaunchRecord> {
    let records: Vec<LaunchRecord> = (0 .. count)
        .map(|index| {
            record(&format!("id-{index:03}"), "2020-01-01T00:00:00.000Z", index % 3 == 0, "F9")
        })
        .collect();
    for record in &records {
        store.put(record).unwrap();
    }
    records
}

// ============================================================================
// SECTION: Upsert
// ============================================================================

#[test]
fn put_then_query_partition_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let first = record("a1", "2020-01-01T00:00:00.000Z", false, "Falcon 9");
    store.put(&first).unwrap();
    let loaded = store.query_partition(&LaunchId::new("a1"), 1).unwrap();
    assert_eq!(loaded, vec![first]);
    assert!(store.query_partition(&LaunchId::new("missing"), 1).unwrap().is_empty());
}

#[test]
fn put_overwrites_same_composite_key() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.put(&record("a1", "2020-01-01T00:00:00.000Z", true, "F9")).unwrap();
    store.put(&record("a1", "2020-01-01T00:00:00.000Z", false, "F9")).unwrap();
    assert_eq!(store.count().unwrap(), 1);
    let loaded = store.query_partition(&LaunchId::new("a1"), 10).unwrap();
    assert_eq!(loaded[0].status, LaunchStatus::Success);
}

#[test]
fn partition_holds_multiple_dates_in_order() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.put(&record("a1", "2021-06-01T00:00:00.000Z", false, "F9")).unwrap();
    store.put(&record("a1", "2020-06-01T00:00:00.000Z", false, "F9")).unwrap();
    let loaded = store.query_partition(&LaunchId::new("a1"), 10).unwrap();
    let dates: Vec<&str> = loaded.iter().map(|record| record.launch_date.as_str()).collect();
    assert_eq!(dates, vec!["2020-06-01T00:00:00.000Z", "2021-06-01T00:00:00.000Z"]);
    assert_eq!(store.query_partition(&LaunchId::new("a1"), 1).unwrap().len(), 1);
}

#[test]
fn records_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    seed(&open(&dir), 4);
    let reopened = open(&dir);
    assert_eq!(reopened.count().unwrap(), 4);
    reopened.readiness().unwrap();
}

#[test]
fn concurrent_writers_do_not_lose_records() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(open(&dir));
    let handles: Vec<_> = (0 .. 4)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for index in 0 .. 10 {
                    let id = format!("w{worker}-{index}");
                    store.put(&record(&id, "2020-01-01T00:00:00.000Z", false, "F9")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.count().unwrap(), 40);
}

#[test]
fn oversized_records_are_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    let mut large = record("big", "2020-01-01T00:00:00.000Z", false, "F9");
    large.details = "x".repeat(MAX_RECORD_BYTES + 1);
    let err = store.put(&large).unwrap_err();
    assert!(matches!(err, StoreError::Invalid(ref message) if message.contains("size limit")));
    assert_eq!(store.count().unwrap(), 0);
}

// ============================================================================
// SECTION: Scan
// ============================================================================

#[test]
fn scan_examines_limit_and_filters_afterwards() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    seed(&store, 9);
    let request =
        ScanRequest::new(6).with_filter(Some(ScanFilter::Status(LaunchStatus::Upcoming)));
    let page = store.scan(&request).unwrap();
    assert_eq!(page.scanned_count, 6);
    assert_eq!(page.items.len(), 2);
    assert!(page.next_cursor.is_some());

    let rest = store.scan(&request.with_cursor(page.next_cursor)).unwrap();
    assert_eq!(rest.scanned_count, 3);
    assert_eq!(rest.items.len(), 1);
    assert!(rest.next_cursor.is_none());
}

#[test]
fn exact_final_page_has_no_cursor() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    seed(&store, 5);
    let page = store.scan(&ScanRequest::new(5)).unwrap();
    assert_eq!(page.scanned_count, 5);
    assert!(page.next_cursor.is_none());
}

#[test]
fn foreign_cursor_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    seed(&store, 2);
    let request = ScanRequest::new(10).with_cursor(Some(PaginationCursor::new("not-a-cursor")));
    assert!(matches!(store.scan(&request), Err(StoreError::InvalidCursor(_))));
}

#[test]
fn query_service_runs_over_sqlite() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    seed(&store, 12);
    let service = QueryService::new(store, QueryConfig::default());
    let page = service.list(Some(5), None).unwrap();
    assert_eq!(page.count, 5);
    let cursor = page.next_cursor.unwrap();
    let next = service.list(Some(5), Some(&cursor)).unwrap();
    assert_eq!(next.items[0].launch_id.as_str(), "id-005");

    let stats = service.statistics().unwrap();
    assert_eq!(stats.sample_size, 12);
    assert_eq!(stats.upcoming, 4);
    assert_eq!(stats.successful, 8);
    assert!(stats.exhaustive);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn cursor_walk_visits_every_row_once(count in 0usize .. 30, page_size in 1usize .. 8) {
        let dir = TempDir::new().unwrap();
        let store = open(&dir);
        let expected: BTreeSet<String> =
            seed(&store, count).into_iter().map(|record| record.launch_id.to_string()).collect();
        let mut seen = Vec::new();
        let mut cursor = None;
        loop {
            let page = store.scan(&ScanRequest::new(page_size).with_cursor(cursor)).unwrap();
            seen.extend(page.items.into_iter().map(|record| record.launch_id.to_string()));
            cursor = page.next_cursor;
            if cursor.is_none() {
                break;
            }
        }
        prop_assert_eq!(seen.len(), expected.len());
        prop_assert_eq!(seen.into_iter().collect::<BTreeSet<_>>(), expected);
    }
}

// ============================================================================
// SECTION: Integrity
// ============================================================================

#[test]
fn tampered_payload_key_fails_closed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    let store = SqliteLaunchStore::new(&config_for_path(&path)).unwrap();
    store.put(&record("a1", "2020-01-01T00:00:00.000Z", false, "F9")).unwrap();
    let other = serde_json::to_vec(&record("zz", "2020-01-01T00:00:00.000Z", false, "F9")).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection
        .execute("UPDATE launches SET record_json = ?1 WHERE launch_id = 'a1'", params![other])
        .unwrap();
    drop(connection);

    let err = store.query_partition(&LaunchId::new("a1"), 1).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(matches!(store.scan(&ScanRequest::new(10)), Err(StoreError::Corrupt(_))));
}

#[test]
fn undecodable_payload_is_invalid() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    let store = SqliteLaunchStore::new(&config_for_path(&path)).unwrap();
    store.put(&record("a1", "2020-01-01T00:00:00.000Z", false, "F9")).unwrap();
    let connection = Connection::open(&path).unwrap();
    connection
        .execute("UPDATE launches SET record_json = ?1", params![b"{not json".to_vec()])
        .unwrap();
    drop(connection);
    assert!(matches!(store.scan(&ScanRequest::new(10)), Err(StoreError::Invalid(_))));
}

#[test]
fn unknown_schema_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ledger.db");
    drop(SqliteLaunchStore::new(&config_for_path(&path)).unwrap());
    let connection = Connection::open(&path).unwrap();
    connection.execute("UPDATE store_meta SET version = 99", params![]).unwrap();
    drop(connection);
    let result = SqliteLaunchStore::new(&config_for_path(&path));
    assert!(matches!(result, Err(SqliteStoreError::VersionMismatch(_))));
}

#[test]
fn directory_and_empty_paths_are_rejected() {
    let dir = TempDir::new().unwrap();
    let result = SqliteLaunchStore::new(&config_for_path(dir.path()));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
    let result = SqliteLaunchStore::new(&config_for_path(Path::new("")));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn overlong_path_component_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("a".repeat(300)).join("ledger.db");
    let result = SqliteLaunchStore::new(&config_for_path(&path));
    assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
}

#[test]
fn parent_directories_are_created() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("ledger.db");
    let store = SqliteLaunchStore::new(&SqliteStoreConfig::new(&path)).unwrap();
    store.readiness().unwrap();
    assert!(path.exists());
}
