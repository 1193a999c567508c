// crates/launch-ledger-core/src/core/decimal.rs
// ============================================================================
// Module: Exact Decimal
// Description: Arbitrary-precision decimal with integer-preserving JSON form.
// Purpose: Store numeric upstream fields without floating approximation.
// Dependencies: bigdecimal, serde, serde_json
// ============================================================================

//! ## Overview
//! [`ExactDecimal`] wraps [`BigDecimal`]. Integral values serialize as JSON
//! integers; anything else serializes as a decimal string so that no consumer
//! ever sees an `f64` rendering of a stored value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use bigdecimal::ToPrimitive;
use bigdecimal::Zero;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de;
use serde_json::Number;

// ============================================================================
// SECTION: Exact Decimal
// ============================================================================

/// Exact decimal value used for flight numbers and epoch seconds.
///
/// Serializes as a JSON integer only when [`Self::fits_json_integer`] holds.
/// Fractional values and integers outside the `i64`/`u64` range serialize as
/// decimal strings, so a numeric field can change JSON type past that range.
/// The transformer rejects such values before they reach a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExactDecimal(BigDecimal);

impl ExactDecimal {
    /// Returns the decimal zero.
    #[must_use]
    pub fn zero() -> Self {
        Self(BigDecimal::zero())
    }

    /// Converts a JSON number through its textual form.
    #[must_use]
    pub fn from_json_number(number: &Number) -> Option<Self> {
        BigDecimal::from_str(&number.to_string()).ok().map(Self)
    }

    /// Returns true when the value has no fractional part.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.0.with_scale(0) == self.0
    }

    /// Returns true when the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::zero()
    }

    /// Returns true when the value is an integer representable as `i64` or `u64`.
    #[must_use]
    pub fn fits_json_integer(&self) -> bool {
        self.is_integer() && (self.0.to_i64().is_some() || self.0.to_u64().is_some())
    }
}

impl Default for ExactDecimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for ExactDecimal {
    fn from(value: u64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl From<i64> for ExactDecimal {
    fn from(value: i64) -> Self {
        Self(BigDecimal::from(value))
    }
}

impl FromStr for ExactDecimal {
    type Err = bigdecimal::ParseBigDecimalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        BigDecimal::from_str(value.trim()).map(Self)
    }
}

impl fmt::Display for ExactDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// ============================================================================
// SECTION: Serde
// ============================================================================

impl Serialize for ExactDecimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_integer() {
            if let Some(value) = self.0.to_i64() {
                return serializer.serialize_i64(value);
            }
            if let Some(value) = self.0.to_u64() {
                return serializer.serialize_u64(value);
            }
        }
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for ExactDecimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ExactDecimalVisitor)
    }
}

/// Visitor accepting integers, floats, and decimal strings.
struct ExactDecimalVisitor;

impl de::Visitor<'_> for ExactDecimalVisitor {
    type Value = ExactDecimal;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an integer, a number, or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(ExactDecimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(ExactDecimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        if !value.is_finite() {
            return Err(E::custom("non-finite decimal"));
        }
        BigDecimal::from_str(&value.to_string()).map(ExactDecimal).map_err(E::custom)
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        ExactDecimal::from_str(value).map_err(E::custom)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
