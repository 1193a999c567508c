// crates/launch-ledger-core/src/core/raw.rs
// ============================================================================
// Module: Raw Upstream Launch
// Description: Optional-field view of one upstream launch object.
// Purpose: Give the transformer typed access to untrusted upstream JSON.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every field is optional and `null` decodes as absent. Key, flag, and
//! numeric fields are typed, so a wrong JSON type there is a structural
//! error. Optional text, nested objects, and the payload list stay as raw
//! [`Value`]s because the transformer defaults any shape it cannot use.
//! Unknown fields are ignored; the upstream schema carries many more.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Number;
use serde_json::Value;

// ============================================================================
// SECTION: Raw Launch
// ============================================================================

/// One upstream launch object as decoded before normalization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLaunch {
    /// Upstream identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Mission name; non-text values fall back to a default.
    #[serde(default)]
    pub name: Option<Value>,
    /// Launch outcome; `None` when absent or null.
    #[serde(default)]
    pub success: Option<bool>,
    /// Whether the launch is still upcoming.
    #[serde(default)]
    pub upcoming: Option<bool>,
    /// ISO-8601 UTC launch date.
    #[serde(default)]
    pub date_utc: Option<String>,
    /// Launch date as epoch seconds.
    #[serde(default)]
    pub date_unix: Option<Number>,
    /// Flight number.
    #[serde(default)]
    pub flight_number: Option<Number>,
    /// Free-form details; non-text values fall back to a default.
    #[serde(default)]
    pub details: Option<Value>,
    /// Nested rocket object.
    #[serde(default)]
    pub rocket: Option<Value>,
    /// Nested launchpad object.
    #[serde(default)]
    pub launchpad: Option<Value>,
    /// Payload list; a non-array value yields no payloads and entries that
    /// are not objects are skipped.
    #[serde(default)]
    pub payloads: Option<Value>,
    /// Nested links object.
    #[serde(default)]
    pub links: Option<Value>,
}
