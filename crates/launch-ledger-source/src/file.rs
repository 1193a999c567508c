// crates/launch-ledger-source/src/file.rs
// ============================================================================
// Module: File Launch Source
// Description: Reads the raw launch list from a local JSON file.
// Purpose: Support offline and fixture-driven ingestion runs.
// Dependencies: launch-ledger-core, serde_json
// ============================================================================

//! ## Overview
//! [`FileLaunchSource`] applies the same body limit and array rule as the HTTP
//! source, so a saved upstream response can be replayed through the pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use launch_ledger_core::LaunchSource;
use launch_ledger_core::SourceError;
use serde_json::Value;

use crate::payload::DEFAULT_MAX_RESPONSE_BYTES;
use crate::payload::parse_launch_array;

// ============================================================================
// SECTION: Source Implementation
// ============================================================================

/// Launch source backed by a JSON array on disk.
#[derive(Debug, Clone)]
pub struct FileLaunchSource {
    /// Path of the JSON file.
    path: PathBuf,
    /// Maximum file size in bytes.
    max_bytes: usize,
}

impl FileLaunchSource {
    /// Creates a file source with the default size limit.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    /// Overrides the size limit.
    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

impl LaunchSource for FileLaunchSource {
    fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let file = File::open(&self.path).map_err(|err| {
            SourceError::Unavailable(format!("cannot open {}: {err}", self.path.display()))
        })?;
        let limit = u64::try_from(self.max_bytes)
            .map_err(|_| SourceError::Invalid("file size limit exceeds u64".to_string()))?;
        let mut bytes = Vec::new();
        file.take(limit.saturating_add(1))
            .read_to_end(&mut bytes)
            .map_err(|err| SourceError::Unavailable(format!("failed to read file: {err}")))?;
        if bytes.len() > self.max_bytes {
            return Err(SourceError::Unavailable("launch file exceeds size limit".to_string()));
        }
        parse_launch_array(&bytes)
    }
}
