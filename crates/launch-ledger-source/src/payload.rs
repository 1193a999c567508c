// crates/launch-ledger-source/src/payload.rs
// ============================================================================
// Module: Upstream Payload Parsing
// Description: Shared body limits and JSON array extraction.
// Purpose: Apply one parsing rule to every source.
// Dependencies: launch-ledger-core, serde_json
// ============================================================================

//! Body limits and JSON array extraction shared by every source.

use launch_ledger_core::SourceError;
use serde_json::Value;

/// Default maximum upstream body size in bytes.
pub const DEFAULT_MAX_RESPONSE_BYTES: usize = 16 * 1024 * 1024;

/// Parses an upstream body into the list of raw launch objects.
///
/// Elements are not inspected here; malformed elements are the transformer's
/// concern and fail per record.
pub(crate) fn parse_launch_array(bytes: &[u8]) -> Result<Vec<Value>, SourceError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|err| SourceError::Unavailable(format!("upstream body is not json: {err}")))?;
    match value {
        Value::Array(launches) => Ok(launches),
        _ => Err(SourceError::Unavailable("upstream body is not a json array".to_string())),
    }
}
