// crates/launch-ledger-source/src/http.rs
// ============================================================================
// Module: HTTP Launch Source
// Description: Bounded HTTPS fetcher for the upstream launch list.
// Purpose: Retrieve the full raw launch list in one GET with strict limits.
// Dependencies: launch-ledger-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpLaunchSource`] issues exactly one GET per fetch. It enforces scheme
//! restrictions, an optional host allowlist, disabled redirects, a request
//! timeout, and a body size limit. Any failure fails the whole fetch; the
//! pipeline treats that as fatal to the run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Read;
use std::time::Duration;

use launch_ledger_core::LaunchSource;
use launch_ledger_core::SourceError;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;

use crate::payload::DEFAULT_MAX_RESPONSE_BYTES;
use crate::payload::parse_launch_array;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Default upstream launch list endpoint.
pub const DEFAULT_LAUNCHES_URL: &str = "https://api.spacexdata.com/v4/launches";

/// Configuration for the HTTP launch source.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - If `allowed_hosts` is set, only listed hosts are permitted.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpSourceConfig {
    /// Upstream launch list URL.
    pub url: String,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// Optional host allowlist.
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LAUNCHES_URL.to_string(),
            allow_http: false,
            timeout_ms: 10_000,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
            allowed_hosts: None,
            user_agent: "launch-ledger/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Source Implementation
// ============================================================================

/// Launch source backed by one upstream HTTP endpoint.
///
/// # Invariants
/// - The URL passed scheme and allowlist validation at construction.
/// - Redirects are not followed.
pub struct HttpLaunchSource {
    /// Source configuration, including limits and policy.
    config: HttpSourceConfig,
    /// Validated upstream URL.
    url: Url,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpLaunchSource {
    /// Creates a source for the configured URL.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Invalid`] when the URL violates policy or the
    /// HTTP client cannot be created.
    pub fn new(config: HttpSourceConfig) -> Result<Self, SourceError> {
        let url = Url::parse(&config.url)
            .map_err(|_| SourceError::Invalid("invalid upstream url".to_string()))?;
        validate_url(&url, &config)?;
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            url,
            client,
        })
    }

    /// Returns the validated upstream URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl LaunchSource for HttpLaunchSource {
    fn fetch(&self) -> Result<Vec<Value>, SourceError> {
        let mut response = self
            .client
            .get(self.url.as_str())
            .send()
            .map_err(|err| SourceError::Unavailable(format!("http request failed: {err}")))?;
        if response.url() != &self.url {
            return Err(SourceError::Unavailable("http redirect not allowed".to_string()));
        }
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!(
                "upstream returned HTTP {}",
                status.as_u16()
            )));
        }
        let body = read_response_limited(&mut response, self.config.max_response_bytes)?;
        parse_launch_array(&body)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates URL scheme and allowlist policy.
fn validate_url(url: &Url, config: &HttpSourceConfig) -> Result<(), SourceError> {
    match url.scheme() {
        "https" => {}
        "http" if config.allow_http => {}
        _ => return Err(SourceError::Invalid("unsupported url scheme".to_string())),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(SourceError::Invalid("url credentials are not allowed".to_string()));
    }
    let host = url
        .host_str()
        .ok_or_else(|| SourceError::Invalid("url host required".to_string()))?;
    if let Some(allowlist) = &config.allowed_hosts {
        let host = normalize_host_label(host);
        let allowed = allowlist.iter().any(|entry| normalize_host_label(entry) == host);
        if !allowed {
            return Err(SourceError::Invalid("url host not allowed".to_string()));
        }
    }
    Ok(())
}

/// Builds the HTTP client with timeout, user agent, and redirects disabled.
fn build_http_client(config: &HttpSourceConfig) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|_| SourceError::Invalid("http client build failed".to_string()))
}

/// Normalizes host labels for allowlist comparisons.
fn normalize_host_label(host: &str) -> String {
    let trimmed = host.trim_end_matches('.');
    let trimmed =
        trimmed.strip_prefix('[').and_then(|inner| inner.strip_suffix(']')).unwrap_or(trimmed);
    trimmed.to_ascii_lowercase()
}

/// Reads the response body while enforcing a byte limit.
fn read_response_limited(response: &mut Response, max_bytes: usize) -> Result<Vec<u8>, SourceError> {
    let expected_len = response.content_length();
    let max_bytes_u64 = u64::try_from(max_bytes)
        .map_err(|_| SourceError::Invalid("response size limit exceeds u64".to_string()))?;
    if let Some(expected) = expected_len
        && expected > max_bytes_u64
    {
        return Err(SourceError::Unavailable("http response exceeds size limit".to_string()));
    }
    let mut buf = Vec::new();
    let mut handle = response.take(max_bytes_u64.saturating_add(1));
    handle
        .read_to_end(&mut buf)
        .map_err(|_| SourceError::Unavailable("failed to read response".to_string()))?;
    if buf.len() > max_bytes {
        return Err(SourceError::Unavailable("http response exceeds size limit".to_string()));
    }
    if let Some(expected) = expected_len {
        let expected = usize::try_from(expected)
            .map_err(|_| SourceError::Unavailable("invalid response length".to_string()))?;
        if buf.len() < expected {
            return Err(SourceError::Unavailable("http response truncated".to_string()));
        }
    }
    Ok(buf)
}
