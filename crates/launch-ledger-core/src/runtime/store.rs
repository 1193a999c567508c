// crates/launch-ledger-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Launch Store
// Description: Ordered in-memory store behind the launch store trait.
// Purpose: Back tests and demos with the same scan contract as durable stores.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`InMemoryLaunchStore`] keeps records in a `BTreeMap` keyed by
//! [`RecordKey`], so iteration order is the scan order. Scans probe one key
//! past the page to decide whether a continuation cursor is returned.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::LaunchDate;
use crate::core::LaunchId;
use crate::core::LaunchRecord;
use crate::core::RecordKey;
use crate::core::decode_cursor;
use crate::core::encode_cursor;
use crate::interfaces::LaunchStore;
use crate::interfaces::ScanPage;
use crate::interfaces::ScanRequest;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory launch store for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLaunchStore {
    /// Record map protected by a mutex.
    records: Arc<Mutex<BTreeMap<RecordKey, LaunchRecord>>>,
}

impl InMemoryLaunchStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every stored record in key order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Store`] when the mutex is poisoned.
    pub fn records(&self) -> Result<Vec<LaunchRecord>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }

    /// Locks the record map.
    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<RecordKey, LaunchRecord>>, StoreError> {
        self.records.lock().map_err(|_| StoreError::Store("launch store mutex poisoned".to_string()))
    }
}

impl LaunchStore for InMemoryLaunchStore {
    fn put(&self, record: &LaunchRecord) -> Result<(), StoreError> {
        self.lock()?.insert(record.key(), record.clone());
        Ok(())
    }

    fn query_partition(
        &self,
        launch_id: &LaunchId,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, StoreError> {
        let guard = self.lock()?;
        let start = RecordKey {
            launch_id: launch_id.clone(),
            launch_date: LaunchDate::new(""),
        };
        Ok(guard
            .range(start ..)
            .take_while(|(key, _)| key.launch_id == *launch_id)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError> {
        let after = request.cursor.as_ref().map(decode_cursor).transpose()?;
        let limit = request.limit.max(1);
        let guard = self.lock()?;
        let range = match after {
            Some(key) => guard.range((Bound::Excluded(key), Bound::Unbounded)),
            None => guard.range::<RecordKey, _>(..),
        };

        let mut items = Vec::new();
        let mut scanned_count = 0;
        let mut last_key = None;
        let mut more = false;
        for (key, record) in range {
            if scanned_count == limit {
                more = true;
                break;
            }
            scanned_count += 1;
            last_key = Some(key);
            if request.filter.as_ref().is_none_or(|filter| filter.matches(record)) {
                items.push(record.clone());
            }
        }

        let next_cursor = match last_key {
            Some(key) if more => {
                Some(encode_cursor(key).map_err(|err| StoreError::Invalid(err.to_string()))?)
            }
            _ => None,
        };
        Ok(ScanPage {
            items,
            next_cursor,
            scanned_count,
        })
    }
}
