// crates/launch-ledger-core/tests/cursor.rs
// ============================================================================
// Module: Pagination Cursor Tests
// Description: Cursor minting and fail-closed decoding.
// Purpose: Ensure tampered or foreign cursors never restart a scan.
// Dependencies: launch-ledger-core, proptest
// ============================================================================

//! ## Overview
//! Cursors must round-trip verbatim and every other token must be rejected.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use launch_ledger_core::CursorError;
use launch_ledger_core::PaginationCursor;
use launch_ledger_core::RecordKey;
use launch_ledger_core::decode_cursor;
use launch_ledger_core::encode_cursor;
use launch_ledger_core::core::cursor::MAX_CURSOR_LENGTH;
use proptest::prelude::*;
use serde_json::json;

fn token(value: &serde_json::Value) -> PaginationCursor {
    PaginationCursor::new(URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap()))
}

#[test]
fn minted_cursor_decodes_to_its_key() {
    let key = RecordKey::new("5eb87cd9ffd86e000604b32a", "2006-03-24T22:30:00.000Z");
    let cursor = encode_cursor(&key).unwrap();
    assert!(!cursor.as_str().contains('='));
    assert_eq!(decode_cursor(&cursor).unwrap(), key);
}

#[test]
fn unknown_version_and_foreign_table_are_rejected() {
    let wrong_version = token(&json!({"v": 2, "table": "launches", "launch_id": "a", "launch_date": "b"}));
    assert_eq!(decode_cursor(&wrong_version), Err(CursorError::Version(2)));
    let foreign = token(&json!({"v": 1, "table": "rockets", "launch_id": "a", "launch_date": "b"}));
    assert_eq!(decode_cursor(&foreign), Err(CursorError::ForeignTable("rockets".to_string())));
}

#[test]
fn malformed_payloads_are_rejected() {
    assert_eq!(decode_cursor(&PaginationCursor::new("***")), Err(CursorError::Encoding));
    let extra = token(&json!({"v": 1, "table": "launches", "launch_id": "a", "launch_date": "b", "x": 1}));
    assert!(matches!(decode_cursor(&extra), Err(CursorError::Payload(_))));
    let empty_id = token(&json!({"v": 1, "table": "launches", "launch_id": "", "launch_date": "b"}));
    assert!(matches!(decode_cursor(&empty_id), Err(CursorError::Payload(_))));
    let long = PaginationCursor::new("A".repeat(MAX_CURSOR_LENGTH + 1));
    assert!(matches!(decode_cursor(&long), Err(CursorError::TooLong { .. })));
}

proptest! {
    #[test]
    fn cursors_round_trip(id in "[a-f0-9]{1,24}", date in "[0-9TZ:.-]{0,24}") {
        let key = RecordKey::new(id, date);
        let cursor = encode_cursor(&key).unwrap();
        prop_assert_eq!(decode_cursor(&cursor).unwrap(), key);
    }

    #[test]
    fn arbitrary_tokens_never_panic(raw in "\\PC{0,256}") {
        let _result = decode_cursor(&PaginationCursor::new(raw));
    }

    #[test]
    fn truncated_cursors_are_rejected(cut in 1usize .. 20) {
        let cursor = encode_cursor(&RecordKey::new("abc", "2020-01-01T00:00:00.000Z")).unwrap();
        let text = cursor.as_str();
        let truncated = PaginationCursor::new(&text[.. text.len() - cut]);
        prop_assert!(decode_cursor(&truncated).is_err());
    }
}
