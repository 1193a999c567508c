// crates/launch-ledger-source/src/lib.rs
// ============================================================================
// Module: Launch Ledger Sources
// Description: LaunchSource implementations for HTTP and local files.
// Purpose: Fetch the raw upstream launch list with strict limits.
// Dependencies: launch-ledger-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate ships the upstream fetchers used by the ingestion pipeline. Each
//! source returns the full raw launch list or fails the whole fetch; there is
//! no partial result and no retry. Responses are untrusted: size limits are
//! enforced before parsing and the body must be a JSON array.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod file;
pub mod http;
mod payload;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use file::FileLaunchSource;
pub use http::DEFAULT_LAUNCHES_URL;
pub use http::HttpLaunchSource;
pub use http::HttpSourceConfig;
pub use payload::DEFAULT_MAX_RESPONSE_BYTES;
