//! Shared helpers for money handling.
//!
//! Currency amounts live as `rust_decimal::Decimal` in the domain and as
//! TEXT columns in SQLite; these helpers keep the two sides consistent.

use log::error;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::constants::CURRENCY_DECIMAL_PRECISION;

/// Parse a stored decimal string, tolerating scientific notation by
/// falling back to an f64 parse. Unparseable values become ZERO with an
/// error log rather than failing the whole read.
pub fn parse_decimal_tolerant(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e_decimal) => match f64::from_str(value_str) {
            Ok(f_val) => match Decimal::from_f64(f_val) {
                Some(d) => d,
                None => {
                    error!(
                        "Failed to convert {} '{}' (parsed as f64: {}) to Decimal.",
                        field_name, value_str, f_val
                    );
                    Decimal::ZERO
                }
            },
            Err(e_f64) => {
                error!(
                    "Failed to parse {} '{}': as Decimal (err: {}), and as f64 (err: {}). Falling back to ZERO.",
                    field_name, value_str, e_decimal, e_f64
                );
                Decimal::ZERO
            }
        },
    }
}

/// Round a currency amount to the ledger's precision (2 decimal places,
/// midpoint away from zero).
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(
        CURRENCY_DECIMAL_PRECISION,
        RoundingStrategy::MidpointAwayFromZero,
    )
}
