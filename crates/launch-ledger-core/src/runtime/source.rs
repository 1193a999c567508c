// crates/launch-ledger-core/src/runtime/source.rs
// ============================================================================
// Module: Static Launch Source
// Description: Fixed in-memory upstream for tests and demos.
// Purpose: Drive the ingestion pipeline without network access.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! [`StaticLaunchSource`] returns the same list on every fetch, or fails every
//! fetch when built with [`StaticLaunchSource::failing`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::interfaces::LaunchSource;
use crate::interfaces::SourceError;

// ============================================================================
// SECTION: Static Source
// ============================================================================

/// Launch source returning a fixed list.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLaunchSource {
    /// Launches returned by each fetch, or the failure message.
    launches: Result<Vec<Value>, String>,
}

impl StaticLaunchSource {
    /// Creates a source that always returns `launches`.
    #[must_use]
    pub const fn new(launches: Vec<Value>) -> Self {
        Self {
            launches: Ok(launches),
        }
    }

    /// Creates a source whose every fetch fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            launches: Err(message.into()),
        }
    }
}

impl LaunchSource for StaticLaunchSource {
    fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        self.launches.clone().map_err(SourceError::Unavailable)
    }
}
