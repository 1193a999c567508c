// crates/launch-ledger-core/src/core/cursor.rs
// ============================================================================
// Module: Pagination Cursor
// Description: Opaque continuation tokens for keyset scans.
// Purpose: Encode and strictly decode "resume after this key" markers.
// Dependencies: base64, serde, serde_json
// ============================================================================

//! ## Overview
//! A [`PaginationCursor`] is URL-safe base64 (no padding) of a small JSON
//! payload that names the table, a format version, and the last key returned.
//! Decoding is fail-closed: a cursor that does not decode exactly is rejected
//! instead of restarting the scan from the beginning.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::record::LaunchDate;
use crate::core::record::LaunchId;
use crate::core::record::RecordKey;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Cursor payload format version.
pub const CURSOR_VERSION: u32 = 1;
/// Table tag carried by every cursor minted for the launch table.
pub const CURSOR_TABLE: &str = "launches";
/// Maximum accepted cursor length in characters.
pub const MAX_CURSOR_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Cursor Type
// ============================================================================

/// Opaque continuation token returned by scans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaginationCursor(String);

impl PaginationCursor {
    /// Wraps a caller-supplied token without validating it.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaginationCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Cursor codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Cursor exceeds the length limit.
    #[error("cursor exceeds {max} characters")]
    TooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Cursor is not valid base64.
    #[error("cursor is not valid base64")]
    Encoding,
    /// Cursor payload is not the expected JSON shape.
    #[error("cursor payload is malformed: {0}")]
    Payload(String),
    /// Cursor was minted by an unknown format version.
    #[error("unsupported cursor version: {0}")]
    Version(u32),
    /// Cursor belongs to a different table.
    #[error("cursor belongs to table {0}")]
    ForeignTable(String),
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// JSON payload embedded in a cursor.
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CursorPayload {
    /// Format version.
    v: u32,
    /// Table tag.
    table: String,
    /// Partition key of the last returned record.
    launch_id: String,
    /// Sort key of the last returned record.
    launch_date: String,
}

/// Mints a cursor that resumes scanning strictly after `key`.
///
/// # Errors
///
/// Returns [`CursorError::Payload`] when the key is empty or cannot be encoded.
pub fn encode_cursor(key: &RecordKey) -> Result<PaginationCursor, CursorError> {
    if key.launch_id.as_str().is_empty() {
        return Err(CursorError::Payload("empty launch_id".to_string()));
    }
    let payload = CursorPayload {
        v: CURSOR_VERSION,
        table: CURSOR_TABLE.to_string(),
        launch_id: key.launch_id.as_str().to_string(),
        launch_date: key.launch_date.as_str().to_string(),
    };
    let bytes = serde_json::to_vec(&payload).map_err(|err| CursorError::Payload(err.to_string()))?;
    let token = URL_SAFE_NO_PAD.encode(bytes);
    if token.len() > MAX_CURSOR_LENGTH {
        return Err(CursorError::TooLong { max: MAX_CURSOR_LENGTH });
    }
    Ok(PaginationCursor(token))
}

/// Decodes a cursor back into the key it resumes after.
///
/// # Errors
///
/// Returns [`CursorError`] for any token that was not minted by
/// [`encode_cursor`] for the launch table.
pub fn decode_cursor(cursor: &PaginationCursor) -> Result<RecordKey, CursorError> {
    let token = cursor.as_str();
    if token.len() > MAX_CURSOR_LENGTH {
        return Err(CursorError::TooLong { max: MAX_CURSOR_LENGTH });
    }
    let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| CursorError::Encoding)?;
    let payload: CursorPayload =
        serde_json::from_slice(&bytes).map_err(|err| CursorError::Payload(err.to_string()))?;
    if payload.v != CURSOR_VERSION {
        return Err(CursorError::Version(payload.v));
    }
    if payload.table != CURSOR_TABLE {
        return Err(CursorError::ForeignTable(payload.table));
    }
    if payload.launch_id.is_empty() {
        return Err(CursorError::Payload("empty launch_id".to_string()));
    }
    Ok(RecordKey {
        launch_id: LaunchId::new(payload.launch_id),
        launch_date: LaunchDate::new(payload.launch_date),
    })
}
