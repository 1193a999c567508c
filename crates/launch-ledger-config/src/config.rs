// crates/launch-ledger-config/src/config.rs
// ============================================================================
// Module: Launch Ledger Configuration
// Description: Configuration loading and validation for the launch ledger.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: launch-ledger-core, launch-ledger-source,
//               launch-ledger-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section has defaults, so an empty file (or no file at the default
//! location) yields a working configuration. An explicitly named file that
//! cannot be read, parsed, or validated fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use launch_ledger_core::QueryConfig;
use launch_ledger_core::ReadFailurePolicy;
use launch_ledger_core::runtime::query::DEFAULT_PAGE_SIZE;
use launch_ledger_core::runtime::query::DEFAULT_RECENT_OVERFETCH;
use launch_ledger_core::runtime::query::DEFAULT_SEARCH_BATCH_SIZE;
use launch_ledger_core::runtime::query::HARD_MAX_PAGE_SIZE;
use launch_ledger_core::runtime::query::STATISTICS_PAGE_SIZE;
use launch_ledger_core::runtime::query::STATISTICS_SAMPLE_CAP;
use launch_ledger_source::DEFAULT_LAUNCHES_URL;
use launch_ledger_source::DEFAULT_MAX_RESPONSE_BYTES;
use launch_ledger_source::HttpSourceConfig;
use launch_ledger_store_sqlite::SqliteStoreConfig;
use launch_ledger_store_sqlite::SqliteStoreMode;
use launch_ledger_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "launch-ledger.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "LAUNCH_LEDGER_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Minimum upstream request timeout in milliseconds.
pub(crate) const MIN_SOURCE_TIMEOUT_MS: u64 = 100;
/// Maximum upstream request timeout in milliseconds.
pub(crate) const MAX_SOURCE_TIMEOUT_MS: u64 = 120_000;
/// Maximum upstream response size in bytes.
pub(crate) const MAX_SOURCE_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Maximum user agent length.
pub(crate) const MAX_USER_AGENT_LENGTH: usize = 256;
/// Maximum number of allowed upstream hosts.
pub(crate) const MAX_ALLOWED_HOSTS: usize = 64;
/// Maximum `SQLite` busy timeout in milliseconds.
pub(crate) const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Maximum records examined per filter or search batch.
pub(crate) const MAX_SEARCH_BATCH_SIZE: usize = 1_000;
/// Maximum recency over-fetch multiplier.
pub(crate) const MAX_RECENT_OVERFETCH: usize = 10;
/// Maximum statistics sample cap.
pub(crate) const MAX_STATS_SAMPLE_CAP: usize = 100_000;
/// Maximum statistics page size.
pub(crate) const MAX_STATS_PAGE_SIZE: usize = 1_000;
/// Default scheduled ingestion interval (six hours).
pub(crate) const DEFAULT_SCHEDULE_INTERVAL_SECS: u64 = 6 * 60 * 60;
/// Minimum scheduled ingestion interval.
pub(crate) const MIN_SCHEDULE_INTERVAL_SECS: u64 = 1;
/// Maximum scheduled ingestion interval (seven days).
pub(crate) const MAX_SCHEDULE_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Launch ledger configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LedgerConfig {
    /// Upstream source configuration.
    #[serde(default)]
    pub source: SourceConfig,
    /// Store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Query tuning.
    #[serde(default)]
    pub query: QuerySettings,
    /// Scheduled ingestion configuration.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// Event logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LedgerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: `path`, then `LAUNCH_LEDGER_CONFIG`, then
    /// `launch-ledger.toml` in the working directory. Only the last may be
    /// absent, in which case defaults apply.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved)?;
        if !explicit && !resolved.exists() {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses and validates configuration bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the content is oversized, not UTF-8, not
    /// valid TOML, or fails validation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.source.validate()?;
        self.store.validate()?;
        self.query.validate()?;
        self.schedule.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Builds the HTTP fetcher configuration.
    #[must_use]
    pub fn http_source_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            url: self.source.url.trim().to_string(),
            allow_http: self.source.allow_http,
            timeout_ms: self.source.timeout_ms,
            max_response_bytes: self.source.max_response_bytes,
            allowed_hosts: self
                .source
                .allowed_hosts
                .as_ref()
                .map(|hosts| hosts.iter().map(|host| host.trim().to_string()).collect()),
            user_agent: self.source.user_agent.clone(),
        }
    }

    /// Builds the `SQLite` store configuration.
    #[must_use]
    pub fn sqlite_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.store.path.clone(),
            busy_timeout_ms: self.store.busy_timeout_ms,
            journal_mode: self.store.journal_mode,
            sync_mode: self.store.sync_mode,
        }
    }

    /// Builds the query service configuration.
    #[must_use]
    pub const fn query_config(&self) -> QueryConfig {
        QueryConfig {
            default_page_size: self.query.default_page_size,
            max_page_size: self.query.max_page_size,
            search_batch_size: self.query.search_batch_size,
            recent_overfetch: self.query.recent_overfetch,
            stats_sample_cap: self.query.stats_sample_cap,
            stats_page_size: self.query.stats_page_size,
            on_read_error: self.query.on_read_error,
        }
    }
}

// ============================================================================
// SECTION: Source
// ============================================================================

/// Upstream source configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Upstream launch list URL.
    #[serde(default = "default_source_url")]
    pub url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_source_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum response size in bytes.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
    /// Allow cleartext HTTP.
    #[serde(default)]
    pub allow_http: bool,
    /// Optional host allowlist.
    #[serde(default)]
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent for outbound requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            timeout_ms: default_source_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
            allow_http: false,
            allowed_hosts: None,
            user_agent: default_user_agent(),
        }
    }
}

impl SourceConfig {
    /// Validates source configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(self.url.trim())
            .map_err(|_| ConfigError::Invalid("source.url must be a valid url".to_string()))?;
        match url.scheme() {
            "https" => {}
            "http" if self.allow_http => {}
            "http" => {
                return Err(ConfigError::Invalid(
                    "source.url uses http but source.allow_http is false".to_string(),
                ));
            }
            _ => {
                return Err(ConfigError::Invalid("source.url scheme must be https".to_string()));
            }
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(ConfigError::Invalid(
                "source.url must not embed credentials".to_string(),
            ));
        }
        let host = url
            .host_str()
            .ok_or_else(|| ConfigError::Invalid("source.url requires a host".to_string()))?;
        if !(MIN_SOURCE_TIMEOUT_MS ..= MAX_SOURCE_TIMEOUT_MS).contains(&self.timeout_ms) {
            return Err(ConfigError::Invalid(format!(
                "source.timeout_ms must be between {MIN_SOURCE_TIMEOUT_MS} and \
                 {MAX_SOURCE_TIMEOUT_MS}"
            )));
        }
        if self.max_response_bytes == 0 || self.max_response_bytes > MAX_SOURCE_RESPONSE_BYTES {
            return Err(ConfigError::Invalid(format!(
                "source.max_response_bytes must be between 1 and {MAX_SOURCE_RESPONSE_BYTES}"
            )));
        }
        let user_agent = self.user_agent.trim();
        if user_agent.is_empty() || user_agent.len() > MAX_USER_AGENT_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "source.user_agent must be 1 to {MAX_USER_AGENT_LENGTH} characters"
            )));
        }
        if let Some(hosts) = &self.allowed_hosts {
            if hosts.is_empty() || hosts.len() > MAX_ALLOWED_HOSTS {
                return Err(ConfigError::Invalid(format!(
                    "source.allowed_hosts must list 1 to {MAX_ALLOWED_HOSTS} hosts"
                )));
            }
            if hosts.iter().any(|entry| entry.trim().is_empty()) {
                return Err(ConfigError::Invalid(
                    "source.allowed_hosts entries must be non-empty".to_string(),
                ));
            }
            let host = host.trim_end_matches('.').to_ascii_lowercase();
            let listed = hosts
                .iter()
                .any(|entry| entry.trim().trim_end_matches('.').to_ascii_lowercase() == host);
            if !listed {
                return Err(ConfigError::Invalid(
                    "source.url host is not in source.allowed_hosts".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Returns the default upstream URL.
fn default_source_url() -> String {
    DEFAULT_LAUNCHES_URL.to_string()
}

/// Returns the default upstream request timeout.
const fn default_source_timeout_ms() -> u64 {
    10_000
}

/// Returns the default upstream response size limit.
const fn default_max_response_bytes() -> usize {
    DEFAULT_MAX_RESPONSE_BYTES
}

/// Returns the default user agent.
fn default_user_agent() -> String {
    "launch-ledger/0.1".to_string()
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite` store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Database file path.
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("store.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "store.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        Ok(())
    }
}

/// Returns the default database path.
fn default_store_path() -> PathBuf {
    PathBuf::from("launch-ledger.db")
}

/// Returns the default busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    5_000
}

// ============================================================================
// SECTION: Query
// ============================================================================

/// Query tuning configuration.
///
/// # Invariants
/// - `max_page_size` may lower the hard maximum of 100 but never raise it.
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySettings {
    /// Listing page size when the caller passes none.
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// Upper bound for page sizes and limits.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    /// Records examined per filter or search batch.
    #[serde(default = "default_search_batch_size")]
    pub search_batch_size: usize,
    /// Recency over-fetch multiplier.
    #[serde(default = "default_recent_overfetch")]
    pub recent_overfetch: usize,
    /// Maximum records sampled for statistics.
    #[serde(default = "default_stats_sample_cap")]
    pub stats_sample_cap: usize,
    /// Records examined per statistics page.
    #[serde(default = "default_stats_page_size")]
    pub stats_page_size: usize,
    /// Behavior when a store read fails.
    #[serde(default)]
    pub on_read_error: ReadFailurePolicy,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            search_batch_size: default_search_batch_size(),
            recent_overfetch: default_recent_overfetch(),
            stats_sample_cap: default_stats_sample_cap(),
            stats_page_size: default_stats_page_size(),
            on_read_error: ReadFailurePolicy::default(),
        }
    }
}

impl QuerySettings {
    /// Validates query configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 || self.max_page_size > HARD_MAX_PAGE_SIZE {
            return Err(ConfigError::Invalid(format!(
                "query.max_page_size must be between 1 and {HARD_MAX_PAGE_SIZE}"
            )));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ConfigError::Invalid(
                "query.default_page_size must be between 1 and query.max_page_size".to_string(),
            ));
        }
        ensure_range("query.search_batch_size", self.search_batch_size, MAX_SEARCH_BATCH_SIZE)?;
        ensure_range("query.recent_overfetch", self.recent_overfetch, MAX_RECENT_OVERFETCH)?;
        ensure_range("query.stats_sample_cap", self.stats_sample_cap, MAX_STATS_SAMPLE_CAP)?;
        ensure_range("query.stats_page_size", self.stats_page_size, MAX_STATS_PAGE_SIZE)?;
        Ok(())
    }
}

/// Returns the default listing page size.
const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Returns the default page size ceiling.
const fn default_max_page_size() -> usize {
    HARD_MAX_PAGE_SIZE
}

/// Returns the default search batch size.
const fn default_search_batch_size() -> usize {
    DEFAULT_SEARCH_BATCH_SIZE
}

/// Returns the default recency over-fetch multiplier.
const fn default_recent_overfetch() -> usize {
    DEFAULT_RECENT_OVERFETCH
}

/// Returns the default statistics sample cap.
const fn default_stats_sample_cap() -> usize {
    STATISTICS_SAMPLE_CAP
}

/// Returns the default statistics page size.
const fn default_stats_page_size() -> usize {
    STATISTICS_PAGE_SIZE
}

// ============================================================================
// SECTION: Schedule
// ============================================================================

/// Scheduled ingestion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Seconds between ingestion runs.
    #[serde(default = "default_schedule_interval_secs")]
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_schedule_interval_secs(),
        }
    }
}

impl ScheduleConfig {
    /// Validates schedule configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_interval_secs(self.interval_secs)
    }
}

/// Returns the default schedule interval.
const fn default_schedule_interval_secs() -> u64 {
    DEFAULT_SCHEDULE_INTERVAL_SECS
}

/// Validates a schedule interval in seconds.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the interval is outside the
/// supported range.
pub fn validate_interval_secs(interval_secs: u64) -> Result<(), ConfigError> {
    if !(MIN_SCHEDULE_INTERVAL_SECS ..= MAX_SCHEDULE_INTERVAL_SECS).contains(&interval_secs) {
        return Err(ConfigError::Invalid(format!(
            "schedule.interval_secs must be between {MIN_SCHEDULE_INTERVAL_SECS} and \
             {MAX_SCHEDULE_INTERVAL_SECS}"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Event sink selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogSink {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to `logging.path`.
    File,
    /// Discard events.
    None,
}

/// Event logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Sink selection.
    #[serde(default)]
    pub sink: LogSink,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Validates logging configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (LogSink::File, None) => {
                Err(ConfigError::Invalid("file logging requires logging.path".to_string()))
            }
            (LogSink::File, Some(path)) => {
                validate_path_string("logging.path", &path.to_string_lossy())
            }
            (_, Some(_)) => Err(ConfigError::Invalid(
                "logging.path is only valid with sink = \"file\"".to_string(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path; the flag is false only for the implicit default.
fn resolve_path(
    path: Option<&Path>,
    env_path: Option<String>,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Ensures a count lies in `[1, max]`.
fn ensure_range(field: &str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value == 0 || value > max {
        return Err(ConfigError::Invalid(format!("{field} must be between 1 and {max}")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn explicit_path_wins_over_env() {
        let (path, explicit) =
            resolve_path(Some(Path::new("a.toml")), Some("b.toml".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("a.toml"));
        assert!(explicit);
    }

    #[test]
    fn env_path_is_explicit() {
        let (path, explicit) = resolve_path(None, Some("b.toml".to_string())).unwrap();
        assert_eq!(path, PathBuf::from("b.toml"));
        assert!(explicit);
    }

    #[test]
    fn default_path_is_implicit() {
        let (path, explicit) = resolve_path(None, None).unwrap();
        assert_eq!(path, PathBuf::from(DEFAULT_CONFIG_NAME));
        assert!(!explicit);
    }

    #[test]
    fn overlong_env_path_is_rejected() {
        let result = resolve_path(None, Some("a".repeat(MAX_TOTAL_PATH_LENGTH + 1)));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_path_string_rejects_whitespace_only() {
        assert!(validate_path_string("store.path", "   ").is_err());
        assert!(validate_path_string("store.path", "./data/ledger.db").is_ok());
    }
}
