//! Helpers for reading loosely typed numbers out of client payloads.
//!
//! Clients send prices and quantities either as JSON numbers or as strings;
//! both forms are accepted here and anything else is treated as unparseable.

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

fn parse_decimal_str(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Reads a decimal from a JSON number or numeric string.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    }
}

/// Reads a whole number from a JSON number or numeric string.
///
/// Integral floats such as `2.0` are accepted; fractional values are not.
pub fn integer_from_json(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Rounds to `dp` places, halves away from zero.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses a decimal read back from storage, falling back to zero on corrupt data.
pub fn parse_stored_decimal(value_str: &str, field_name: &str) -> Decimal {
    match parse_decimal_str(value_str) {
        Some(d) => d,
        None => {
            log::error!(
                "Failed to parse stored {} '{}' as Decimal. Falling back to ZERO.",
                field_name,
                value_str
            );
            Decimal::ZERO
        }
    }
}
