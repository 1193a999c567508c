// crates/launch-ledger-core/src/core/record.rs
// ============================================================================
// Module: Launch Records
// Description: Persisted launch record, composite key, and status enum.
// Purpose: Provide strongly typed, serializable record shapes with stable wire forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`LaunchRecord`] is identified by its composite [`RecordKey`]: the
//! partition key [`LaunchId`] plus the sort key [`LaunchDate`]. Keys order by
//! partition first and then by sort key, which is also the scan order every
//! store must honor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::decimal::ExactDecimal;

// ============================================================================
// SECTION: Key Types
// ============================================================================

/// Partition key of a launch record.
///
/// # Invariants
/// - Opaque UTF-8 string; the transformer rejects empty values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchId(String);

impl LaunchId {
    /// Creates a new launch identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort key of a launch record (ISO-8601 UTC string).
///
/// # Invariants
/// - Compared lexicographically; ISO-8601 UTC strings sort chronologically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchDate(String);

impl LaunchDate {
    /// Creates a new launch date key.
    #[must_use]
    pub fn new(date: impl Into<String>) -> Self {
        Self(date.into())
    }

    /// Returns the date as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaunchDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Composite key (partition key + sort key) of a launch record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    /// Partition key.
    pub launch_id: LaunchId,
    /// Sort key.
    pub launch_date: LaunchDate,
}

impl RecordKey {
    /// Creates a composite key.
    #[must_use]
    pub fn new(launch_id: impl Into<String>, launch_date: impl Into<String>) -> Self {
        Self {
            launch_id: LaunchId::new(launch_id),
            launch_date: LaunchDate::new(launch_date),
        }
    }
}

// ============================================================================
// SECTION: Launch Status
// ============================================================================

/// Normalized launch outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchStatus {
    /// The launch succeeded.
    Success,
    /// The launch failed.
    Failed,
    /// The launch has not happened yet.
    Upcoming,
    /// The launch happened but its outcome is not reported.
    Unknown,
}

impl LaunchStatus {
    /// Every status value, in wire order.
    pub const ALL: [Self; 4] = [Self::Success, Self::Failed, Self::Upcoming, Self::Unknown];

    /// Derives the status from the upstream `success` and `upcoming` fields.
    ///
    /// `upcoming` wins over everything; an absent `success` is `Unknown`.
    #[must_use]
    pub const fn from_upstream(success: Option<bool>, upcoming: bool) -> Self {
        if upcoming {
            return Self::Upcoming;
        }
        match success {
            None => Self::Unknown,
            Some(true) => Self::Success,
            Some(false) => Self::Failed,
        }
    }

    /// Returns the wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
            Self::Upcoming => "upcoming",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for LaunchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status label is not one of the four wire values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown launch status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for LaunchStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseStatusError(value.to_string()))
    }
}

// ============================================================================
// SECTION: Launch Record
// ============================================================================

/// Normalized launch record persisted in the store.
///
/// # Invariants
/// - (`launch_id`, `launch_date`) is unique; writes with the same pair overwrite.
/// - `payload_names` and `payload_types` are index-aligned.
/// - `status` is derived from upstream fields, never set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchRecord {
    /// Partition key.
    pub launch_id: LaunchId,
    /// Sort key (ISO-8601 UTC launch date).
    pub launch_date: LaunchDate,
    /// Mission name.
    pub mission_name: String,
    /// Rocket name, `N/A` when unresolved.
    pub rocket_name: String,
    /// Derived launch status.
    pub status: LaunchStatus,
    /// Short launchpad name, `N/A` when unresolved.
    pub launchpad_name: String,
    /// Full launchpad name, `N/A` when unresolved.
    pub launchpad_full_name: String,
    /// Payload names in upstream order.
    pub payload_names: Vec<String>,
    /// Payload types, index-aligned with `payload_names`.
    pub payload_types: Vec<String>,
    /// Mission patch image URL.
    pub patch_image: String,
    /// Webcast URL.
    pub webcast_url: String,
    /// Article URL.
    pub article_url: String,
    /// Wikipedia URL.
    pub wikipedia_url: String,
    /// Free-form launch details.
    pub details: String,
    /// Flight number as an exact decimal.
    pub flight_number: ExactDecimal,
    /// Launch date as epoch seconds, exact decimal.
    pub launch_date_unix: ExactDecimal,
    /// RFC 3339 timestamp of the transform that produced this record.
    pub last_updated: String,
}

impl LaunchRecord {
    /// Returns the composite key of this record.
    #[must_use]
    pub fn key(&self) -> RecordKey {
        RecordKey {
            launch_id: self.launch_id.clone(),
            launch_date: self.launch_date.clone(),
        }
    }
}
