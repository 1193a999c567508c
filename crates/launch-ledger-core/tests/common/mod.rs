// crates/launch-ledger-core/tests/common/mod.rs
// ============================================================================
// Module: Shared Test Fixtures
// Description: Raw launch builders and store doubles for core tests.
// Purpose: Keep fixtures consistent across ingestion and query tests.
// ============================================================================

//! Shared fixtures for launch-ledger-core integration tests.

#![allow(dead_code, reason = "Each test binary uses a different subset of fixtures.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeSet;

use launch_ledger_core::InMemoryLaunchStore;
use launch_ledger_core::LaunchId;
use launch_ledger_core::LaunchRecord;
use launch_ledger_core::LaunchStatus;
use launch_ledger_core::LaunchStore;
use launch_ledger_core::ScanPage;
use launch_ledger_core::ScanRequest;
use launch_ledger_core::StoreError;
use launch_ledger_core::transform_launch;
use serde_json::Value;
use serde_json::json;

/// Fixed transform timestamp used by fixtures.
pub const FIXED_NOW: &str = "2024-01-01T00:00:00Z";

/// Builds a raw upstream launch object.
pub fn raw_launch(
    id: &str,
    date: &str,
    name: &str,
    success: Option<bool>,
    upcoming: bool,
    rocket: &str,
) -> Value {
    json!({
        "id": id,
        "name": name,
        "success": success,
        "upcoming": upcoming,
        "date_utc": date,
        "date_unix": 1_700_000_000,
        "flight_number": 7,
        "rocket": { "name": rocket },
        "launchpad": { "name": "SLC 40", "full_name": "Space Launch Complex 40" },
        "payloads": [{ "name": format!("{name} payload"), "type": "Satellite" }],
        "links": {
            "patch": { "small": "https://images.example/patch.png" },
            "webcast": "https://video.example/watch",
            "article": null,
            "wikipedia": "https://wiki.example/launch"
        },
        "details": null
    })
}

/// Builds a normalized record with the given status.
pub fn record(id: &str, date: &str, name: &str, status: LaunchStatus, rocket: &str) -> LaunchRecord {
    let (success, upcoming) = match status {
        LaunchStatus::Success => (Some(true), false),
        LaunchStatus::Failed => (Some(false), false),
        LaunchStatus::Upcoming => (None, true),
        LaunchStatus::Unknown => (None, false),
    };
    transform_launch(&raw_launch(id, date, name, success, upcoming, rocket), FIXED_NOW).unwrap()
}

/// Creates an in-memory store holding `records`.
pub fn seeded_store(records: &[LaunchRecord]) -> InMemoryLaunchStore {
    let store = InMemoryLaunchStore::new();
    for record in records {
        store.put(record).unwrap();
    }
    store
}

/// Store double that rejects writes for chosen ids and can fail every read.
#[derive(Clone, Default)]
pub struct FlakyStore {
    /// Backing store for accepted writes and reads.
    pub inner: InMemoryLaunchStore,
    /// Launch ids whose writes fail.
    pub reject_ids: BTreeSet<String>,
    /// Fail every read when true.
    pub fail_reads: bool,
}

impl FlakyStore {
    /// Store whose every read fails.
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    /// Store rejecting writes for `ids`.
    pub fn rejecting(ids: &[&str]) -> Self {
        Self {
            reject_ids: ids.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }
}

impl LaunchStore for FlakyStore {
    fn put(&self, record: &LaunchRecord) -> Result<(), StoreError> {
        if self.reject_ids.contains(record.launch_id.as_str()) {
            return Err(StoreError::Io("write throttled".to_string()));
        }
        self.inner.put(record)
    }

    fn query_partition(
        &self,
        launch_id: &LaunchId,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Io("read timed out".to_string()));
        }
        self.inner.query_partition(launch_id, limit)
    }

    fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Io("read timed out".to_string()));
        }
        self.inner.scan(request)
    }
}
