// crates/launch-ledger-source/tests/http_source.rs
// ============================================================================
// Module: HTTP Launch Source Tests
// Description: Fetch behavior against a local upstream server.
// Purpose: Validate status handling, body limits, array checks, and URL policy.
// ============================================================================

//! ## Overview
//! Serves canned upstream responses with `tiny_http` and asserts that every
//! failure surfaces as an unavailable source, which the pipeline treats as
//! fatal to the run.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeSet;
use std::io::Read;
use std::io::Write;
use std::net::TcpListener;
use std::thread;

use launch_ledger_core::InMemoryLaunchStore;
use launch_ledger_core::IngestError;
use launch_ledger_core::IngestionPipeline;
use launch_ledger_core::LaunchSource;
use launch_ledger_core::SourceError;
use launch_ledger_source::HttpLaunchSource;
use launch_ledger_source::HttpSourceConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Test Helpers
// ============================================================================

/// Creates a source allowed to reach the local server.
fn local_source(url: &str) -> HttpLaunchSource {
    HttpLaunchSource::new(local_config(url)).unwrap()
}

/// Config allowing cleartext HTTP to 127.0.0.1.
fn local_config(url: &str) -> HttpSourceConfig {
    HttpSourceConfig {
        url: url.to_string(),
        allow_http: true,
        allowed_hosts: Some(BTreeSet::from(["127.0.0.1".to_string()])),
        timeout_ms: 5_000,
        ..HttpSourceConfig::default()
    }
}

/// Serves one response and returns the URL plus the server thread.
fn serve_once(status: u16, body: &'static str) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body).with_status_code(status).with_header(header);
            let _ = request.respond(response);
        }
    });
    (format!("http://{addr}/v4/launches"), handle)
}

fn raw_http_response_server(response: Vec<u8>) -> (String, thread::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(&response);
            let _ = stream.flush();
        }
    });
    (format!("http://{addr}/"), handle)
}

fn unavailable_message(result: Result<Vec<serde_json::Value>, SourceError>) -> String {
    match result {
        Err(SourceError::Unavailable(message)) => message,
        other => panic!("expected unavailable source, got {other:?}"),
    }
}

// ============================================================================
// SECTION: Fetch
// ============================================================================

#[test]
fn fetch_returns_array_elements_in_order() {
    let (url, handle) = serve_once(200, r#"[{"id":"a"},{"id":"b"},"junk"]"#);
    let launches = local_source(&url).fetch().unwrap();
    handle.join().unwrap();
    assert_eq!(launches.len(), 3);
    assert_eq!(launches[0]["id"], "a");
    assert_eq!(launches[2], "junk");
}

#[test]
fn failure_status_is_unavailable() {
    let (url, handle) = serve_once(503, "service unavailable");
    let message = unavailable_message(local_source(&url).fetch());
    handle.join().unwrap();
    assert!(message.contains("503"), "unexpected message: {message}");
}

#[test]
fn redirects_are_not_followed() {
    let response =
        b"HTTP/1.1 302 Found\r\nLocation: http://127.0.0.1:1/\r\nContent-Length: 0\r\n\r\n".to_vec();
    let (url, handle) = raw_http_response_server(response);
    let message = unavailable_message(local_source(&url).fetch());
    handle.join().unwrap();
    assert!(message.contains("302"), "unexpected message: {message}");
}

#[test]
fn non_array_body_is_unavailable() {
    let (url, handle) = serve_once(200, r#"{"docs":[]}"#);
    let message = unavailable_message(local_source(&url).fetch());
    handle.join().unwrap();
    assert!(message.contains("not a json array"));
}

#[test]
fn invalid_json_is_unavailable() {
    let (url, handle) = serve_once(200, "[{");
    let message = unavailable_message(local_source(&url).fetch());
    handle.join().unwrap();
    assert!(message.contains("not json"));
}

#[test]
fn oversized_body_is_rejected() {
    let (url, handle) = serve_once(200, r#"[{"id":"a"},{"id":"b"}]"#);
    let source = HttpLaunchSource::new(HttpSourceConfig {
        max_response_bytes: 8,
        ..local_config(&url)
    })
    .unwrap();
    let message = unavailable_message(source.fetch());
    handle.join().unwrap();
    assert!(message.contains("size limit"));
}

#[test]
fn truncated_body_is_rejected() {
    let response = b"HTTP/1.1 200 OK\r\nContent-Length: 40\r\n\r\n[{\"id\":\"a\"}]".to_vec();
    let (url, handle) = raw_http_response_server(response);
    let message = unavailable_message(local_source(&url).fetch());
    handle.join().unwrap();
    assert!(
        message.contains("truncated") || message.contains("failed to read response"),
        "unexpected message: {message}"
    );
}

#[test]
fn connection_refused_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let message = unavailable_message(local_source(&format!("http://{addr}/")).fetch());
    assert!(message.contains("http request failed"));
}

#[test]
fn upstream_outage_is_fatal_to_the_run() {
    let (url, handle) = serve_once(500, "boom");
    let store = InMemoryLaunchStore::new();
    let err = IngestionPipeline::new(local_source(&url), store.clone()).run().unwrap_err();
    handle.join().unwrap();
    assert!(matches!(err, IngestError::UpstreamUnavailable(ref message) if message.contains("500")));
    assert!(store.records().unwrap().is_empty());
}

// ============================================================================
// SECTION: URL Policy
// ============================================================================

#[test]
fn cleartext_is_rejected_unless_allowed() {
    let result = HttpLaunchSource::new(HttpSourceConfig {
        url: "http://api.spacexdata.com/v4/launches".to_string(),
        ..HttpSourceConfig::default()
    });
    assert!(matches!(result, Err(SourceError::Invalid(_))));
}

#[test]
fn host_allowlist_is_enforced() {
    let result = HttpLaunchSource::new(HttpSourceConfig {
        allowed_hosts: Some(BTreeSet::from(["example.com".to_string()])),
        ..HttpSourceConfig::default()
    });
    assert!(matches!(result, Err(SourceError::Invalid(ref message)) if message.contains("host")));
    let allowed = HttpLaunchSource::new(HttpSourceConfig {
        allowed_hosts: Some(BTreeSet::from(["API.SpaceXData.com.".to_string()])),
        ..HttpSourceConfig::default()
    });
    assert!(allowed.is_ok());
}

#[test]
fn credentials_and_bad_schemes_are_rejected() {
    for url in ["https://user:pw@api.spacexdata.com/", "ftp://api.spacexdata.com/", "not a url"] {
        let result = HttpLaunchSource::new(HttpSourceConfig {
            url: url.to_string(),
            ..HttpSourceConfig::default()
        });
        assert!(matches!(result, Err(SourceError::Invalid(_))), "accepted {url}");
    }
}

#[test]
fn default_config_targets_https_upstream() {
    let source = HttpLaunchSource::new(HttpSourceConfig::default()).unwrap();
    assert_eq!(source.url().scheme(), "https");
    assert_eq!(source.url().host_str(), Some("api.spacexdata.com"));
}
