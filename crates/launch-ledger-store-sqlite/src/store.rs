// crates/launch-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Launch Store
// Description: Durable LaunchStore backed by a single SQLite table.
// Purpose: Upsert launch records and serve keyset-paginated scans.
// Dependencies: launch-ledger-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`SqliteLaunchStore`] keeps one row per (`launch_id`, `launch_date`) with
//! the full record serialized as JSON. Writes overwrite in place (last writer
//! wins). Scans walk the primary key with keyset pagination and probe one row
//! past the page to decide whether a continuation cursor is returned.
//!
//! Loaded rows are untrusted: the payload must decode and its key must match
//! the row's key columns, otherwise the read fails closed as corruption.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use launch_ledger_core::LaunchId;
use launch_ledger_core::LaunchRecord;
use launch_ledger_core::LaunchStore;
use launch_ledger_core::RecordKey;
use launch_ledger_core::ScanPage;
use launch_ledger_core::ScanRequest;
use launch_ledger_core::StoreError;
use launch_ledger_core::core::time::unix_millis;
use launch_ledger_core::decode_cursor;
use launch_ledger_core::encode_cursor;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum serialized record size accepted by the store.
pub const MAX_RECORD_BYTES: usize = 256 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode; readers do not block on the writer.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` launch store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages name keys but never embed record payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row disagrees with its payload.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Record payload exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "record_json exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed launch store.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Scan order is (`launch_id`, `launch_date`) ascending, byte-wise.
#[derive(Clone)]
pub struct SqliteLaunchStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

/// Raw row selected from the `launches` table.
struct StoredRow {
    /// Partition key column.
    launch_id: String,
    /// Sort key column.
    launch_date: String,
    /// Serialized record payload.
    record_json: Vec<u8>,
}

impl SqliteLaunchStore {
    /// Opens an `SQLite`-backed launch store, creating the schema if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the number of stored records.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn count(&self) -> Result<u64, SqliteStoreError> {
        let guard = self.lock()?;
        let count: i64 = guard
            .query_row("SELECT COUNT(1) FROM launches", params![], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        u64::try_from(count).map_err(|_| SqliteStoreError::Corrupt("negative row count".to_string()))
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite connection mutex poisoned".to_string()))
    }

    /// Upserts one record.
    fn upsert(&self, record: &LaunchRecord) -> Result<(), SqliteStoreError> {
        let record_json =
            serde_json::to_vec(record).map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        if record_json.len() > MAX_RECORD_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_RECORD_BYTES,
                actual_bytes: record_json.len(),
            });
        }
        let updated_at = i64::try_from(unix_millis()).unwrap_or(i64::MAX);
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO launches (launch_id, launch_date, status, rocket_name, record_json, \
                 updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT (launch_id, launch_date) \
                 DO UPDATE SET status = excluded.status, rocket_name = excluded.rocket_name, \
                 record_json = excluded.record_json, updated_at = excluded.updated_at",
                params![
                    record.launch_id.as_str(),
                    record.launch_date.as_str(),
                    record.status.as_str(),
                    record.rocket_name.as_str(),
                    record_json,
                    updated_at
                ],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }

    /// Loads up to `limit` rows of one partition ordered by sort key.
    fn load_partition(
        &self,
        launch_id: &LaunchId,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, SqliteStoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("limit too large".to_string()))?;
        let guard = self.lock()?;
        let mut stmt = guard
            .prepare(
                "SELECT launch_id, launch_date, record_json FROM launches WHERE launch_id = ?1 \
                 ORDER BY launch_date LIMIT ?2",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![launch_id.as_str(), limit], map_stored_row)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = rows
            .map(|row| row.map_err(|err| SqliteStoreError::Db(err.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        drop(stmt);
        drop(guard);
        rows.into_iter().map(decode_row).collect()
    }

    /// Loads up to `limit` rows strictly after `after` in key order.
    fn load_page(
        &self,
        after: Option<&RecordKey>,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, SqliteStoreError> {
        let limit = i64::try_from(limit)
            .map_err(|_| SqliteStoreError::Invalid("limit too large".to_string()))?;
        let guard = self.lock()?;
        let rows = query_rows_after(&guard, after, limit)?;
        drop(guard);
        rows.into_iter().map(decode_row).collect()
    }

    /// Verifies the store can execute a simple SQL statement.
    fn check_connection(&self) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        guard
            .query_row("SELECT 1", params![], |row| row.get::<_, i64>(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }
}

impl LaunchStore for SqliteLaunchStore {
    fn put(&self, record: &LaunchRecord) -> Result<(), StoreError> {
        self.upsert(record).map_err(StoreError::from)
    }

    fn query_partition(
        &self,
        launch_id: &LaunchId,
        limit: usize,
    ) -> Result<Vec<LaunchRecord>, StoreError> {
        self.load_partition(launch_id, limit).map_err(StoreError::from)
    }

    fn scan(&self, request: &ScanRequest) -> Result<ScanPage, StoreError> {
        let after = request.cursor.as_ref().map(decode_cursor).transpose()?;
        let limit = request.limit.max(1);
        let mut examined = self.load_page(after.as_ref(), limit.saturating_add(1))?;
        let more = examined.len() > limit;
        examined.truncate(limit);

        let next_cursor = match examined.last() {
            Some(last) if more => Some(
                encode_cursor(&last.key()).map_err(|err| StoreError::Invalid(err.to_string()))?,
            ),
            _ => None,
        };
        let scanned_count = examined.len();
        let items = examined
            .into_iter()
            .filter(|record| request.filter.as_ref().is_none_or(|filter| filter.matches(record)))
            .collect();
        Ok(ScanPage {
            items,
            next_cursor,
            scanned_count,
        })
    }

    fn readiness(&self) -> Result<(), StoreError> {
        self.check_connection().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection and applies pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies the configured journal, sync, and busy-timeout pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS launches (
                    launch_id TEXT NOT NULL,
                    launch_date TEXT NOT NULL,
                    status TEXT NOT NULL,
                    rocket_name TEXT NOT NULL,
                    record_json BLOB NOT NULL,
                    updated_at INTEGER NOT NULL,
                    PRIMARY KEY (launch_id, launch_date)
                ) WITHOUT ROWID;",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Runs the keyset query with or without a resume key.
fn query_rows_after(
    connection: &Connection,
    after: Option<&RecordKey>,
    limit: i64,
) -> Result<Vec<StoredRow>, SqliteStoreError> {
    if let Some(after) = after {
        let mut stmt = connection
            .prepare(
                "SELECT launch_id, launch_date, record_json FROM launches WHERE (launch_id > ?1 \
                 OR (launch_id = ?1 AND launch_date > ?2)) ORDER BY launch_id, launch_date LIMIT \
                 ?3",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(
                params![after.launch_id.as_str(), after.launch_date.as_str(), limit],
                map_stored_row,
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        rows.map(|row| row.map_err(|err| SqliteStoreError::Db(err.to_string()))).collect()
    } else {
        let mut stmt = connection
            .prepare(
                "SELECT launch_id, launch_date, record_json FROM launches ORDER BY launch_id, \
                 launch_date LIMIT ?1",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let rows = stmt
            .query_map(params![limit], map_stored_row)
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        rows.map(|row| row.map_err(|err| SqliteStoreError::Db(err.to_string()))).collect()
    }
}

/// Maps a selected row into [`StoredRow`].
fn map_stored_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        launch_id: row.get(0)?,
        launch_date: row.get(1)?,
        record_json: row.get(2)?,
    })
}

/// Decodes a stored row and checks its payload against the key columns.
fn decode_row(row: StoredRow) -> Result<LaunchRecord, SqliteStoreError> {
    if row.record_json.len() > MAX_RECORD_BYTES {
        return Err(SqliteStoreError::TooLarge {
            max_bytes: MAX_RECORD_BYTES,
            actual_bytes: row.record_json.len(),
        });
    }
    let record: LaunchRecord = serde_json::from_slice(&row.record_json).map_err(|err| {
        SqliteStoreError::Invalid(format!("record for launch {}: {err}", row.launch_id))
    })?;
    if record.launch_id.as_str() != row.launch_id || record.launch_date.as_str() != row.launch_date
    {
        return Err(SqliteStoreError::Corrupt(format!(
            "key mismatch between row and payload for launch {}",
            row.launch_id
        )));
    }
    Ok(record)
}
