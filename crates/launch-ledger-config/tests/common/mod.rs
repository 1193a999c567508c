//! Shared helpers for launch-ledger-config tests.
// crates/launch-ledger-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Builders for parsed configurations.
// Purpose: Keep suites focused on the rule under test.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use launch_ledger_config::ConfigError;
use launch_ledger_config::LedgerConfig;

/// Parses TOML into a config without running validation.
pub fn config_from_toml(toml: &str) -> Result<LedgerConfig, String> {
    toml::from_str(toml).map_err(|err| err.to_string())
}

/// Returns a config built entirely from defaults.
pub fn minimal_config() -> Result<LedgerConfig, String> {
    config_from_toml("")
}

/// Parses and validates TOML content.
pub fn validated(toml: &str) -> Result<LedgerConfig, ConfigError> {
    LedgerConfig::from_bytes(toml.as_bytes())
}

/// Asserts that a result is an error whose message contains `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error '{message}' did not contain '{needle}'"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
