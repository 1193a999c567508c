// crates/launch-ledger-core/src/core/transform.rs
// ============================================================================
// Module: Launch Transformer
// Description: Normalizes one raw upstream launch object into a record.
// Purpose: Validate untrusted upstream data and apply explicit defaults.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! [`transform_launch`] is deterministic and side-effect free: the
//! `last_updated` timestamp is injected by the caller. Missing or oddly shaped
//! optional data never fails; only a broken composite key, a wrongly typed
//! key or flag field, or a numeric field that cannot be an exact integer
//! rejects the object.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::decimal::ExactDecimal;
use crate::core::raw::RawLaunch;
use crate::core::record::LaunchDate;
use crate::core::record::LaunchId;
use crate::core::record::LaunchRecord;
use crate::core::record::LaunchStatus;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default for unresolved nested names.
pub const NOT_AVAILABLE: &str = "N/A";
/// Default for missing payload sub-fields.
pub const UNKNOWN_PAYLOAD_FIELD: &str = "Unknown";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reasons a raw launch object cannot be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// The raw value is not a JSON object.
    #[error("launch is not a JSON object")]
    NotAnObject,
    /// A top-level field has the wrong JSON type.
    #[error("malformed launch: {0}")]
    Malformed(String),
    /// A composite key field is absent or empty.
    #[error("launch is missing key field {0}")]
    MissingKey(&'static str),
    /// A numeric field cannot be stored as an exact integer.
    #[error("invalid {field}: {value}")]
    InvalidNumber {
        /// Field name.
        field: &'static str,
        /// Offending value as text.
        value: String,
    },
}

// ============================================================================
// SECTION: Transform
// ============================================================================

/// Normalizes one raw upstream launch object.
///
/// # Errors
///
/// Returns [`TransformError`] when the object cannot produce a valid record;
/// callers skip the record and continue with the batch.
pub fn transform_launch(raw: &Value, now: &str) -> Result<LaunchRecord, TransformError> {
    if !raw.is_object() {
        return Err(TransformError::NotAnObject);
    }
    let launch =
        RawLaunch::deserialize(raw).map_err(|err| TransformError::Malformed(err.to_string()))?;

    let launch_id = required_key(launch.id, "id")?;
    let launch_date = required_key(launch.date_utc, "date_utc")?;
    let flight_number = exact_integer(launch.flight_number.as_ref(), "flight_number", false)?;
    let launch_date_unix = exact_integer(launch.date_unix.as_ref(), "date_unix", true)?;

    let rocket = launch.rocket.as_ref().and_then(Value::as_object);
    let launchpad = launch.launchpad.as_ref().and_then(Value::as_object);
    let links = launch.links.as_ref().and_then(Value::as_object);

    let payloads = launch.payloads.as_ref().and_then(Value::as_array);
    let (payload_names, payload_types) = payload_columns(payloads.map(Vec::as_slice));
    let patch_image = links
        .and_then(|links| links.get("patch"))
        .and_then(Value::as_object)
        .map(|patch| nested_str(patch, "small", ""))
        .unwrap_or_default();

    Ok(LaunchRecord {
        launch_id: LaunchId::new(launch_id),
        launch_date: LaunchDate::new(launch_date),
        mission_name: scalar_text(launch.name.as_ref())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        rocket_name: nested_or_na(rocket, "name"),
        status: LaunchStatus::from_upstream(launch.success, launch.upcoming.unwrap_or(false)),
        launchpad_name: nested_or_na(launchpad, "name"),
        launchpad_full_name: nested_or_na(launchpad, "full_name"),
        payload_names,
        payload_types,
        patch_image,
        webcast_url: links.map(|obj| nested_str(obj, "webcast", "")).unwrap_or_default(),
        article_url: links.map(|obj| nested_str(obj, "article", "")).unwrap_or_default(),
        wikipedia_url: links.map(|obj| nested_str(obj, "wikipedia", "")).unwrap_or_default(),
        details: scalar_text(launch.details.as_ref()).unwrap_or_default(),
        flight_number,
        launch_date_unix,
        last_updated: now.to_string(),
    })
}

/// Returns the upstream `id` of a raw object when it is a string.
#[must_use]
pub fn raw_launch_id(raw: &Value) -> Option<String> {
    raw.get("id").and_then(Value::as_str).map(ToString::to_string)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects absent or empty composite key fields.
fn required_key(value: Option<String>, field: &'static str) -> Result<String, TransformError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(TransformError::MissingKey(field)),
    }
}

/// Converts an optional JSON number into an exact integer within the 64-bit range.
fn exact_integer(
    value: Option<&Number>,
    field: &'static str,
    allow_negative: bool,
) -> Result<ExactDecimal, TransformError> {
    let Some(number) = value else {
        return Ok(ExactDecimal::zero());
    };
    let invalid = || TransformError::InvalidNumber { field, value: number.to_string() };
    let decimal = ExactDecimal::from_json_number(number).ok_or_else(invalid)?;
    if !decimal.fits_json_integer() || (!allow_negative && decimal.is_negative()) {
        return Err(invalid());
    }
    Ok(decimal)
}

/// Renders a top-level text field; numbers and booleans keep their JSON text.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads a nested string field, falling back when absent or not a string.
fn nested_str(object: &Map<String, Value>, key: &str, fallback: &str) -> String {
    object.get(key).and_then(Value::as_str).unwrap_or(fallback).to_string()
}

/// Reads a name from an optional nested object, defaulting to `N/A`.
fn nested_or_na(object: Option<&Map<String, Value>>, key: &str) -> String {
    object.map_or_else(|| NOT_AVAILABLE.to_string(), |obj| nested_str(obj, key, NOT_AVAILABLE))
}

/// Builds index-aligned payload name and type columns.
fn payload_columns(payloads: Option<&[Value]>) -> (Vec<String>, Vec<String>) {
    let entries = payloads.unwrap_or_default().iter().filter_map(Value::as_object);
    entries
        .map(|payload| {
            (
                nested_str(payload, "name", UNKNOWN_PAYLOAD_FIELD),
                nested_str(payload, "type", UNKNOWN_PAYLOAD_FIELD),
            )
        })
        .unzip()
}
