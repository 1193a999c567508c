// crates/launch-ledger-core/src/core/time.rs
// ============================================================================
// Module: Wall Clock Helpers
// Description: Current time in the formats stored and logged by the ledger.
// Purpose: Keep clock reads at the runtime edge so core logic stays pure.
// Dependencies: time
// ============================================================================

//! ## Overview
//! Records and summaries carry RFC 3339 UTC strings; events carry epoch
//! milliseconds. Only the runtime calls these helpers; the transformer takes
//! its timestamp as an argument.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Returns the current UTC time formatted as RFC 3339.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Returns milliseconds since the Unix epoch.
#[must_use]
pub fn unix_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}
