//! Presentation rounding
//!
//! Applied only when an output record is populated. Half-way values round away
//! from zero.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Round a fixed-point value to `dp` fractional digits
pub fn round_decimal(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a float to `dp` fractional digits through its exact decimal expansion.
///
/// Non-finite or out-of-range values are returned unchanged.
pub fn round_f64(value: f64, dp: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    Decimal::from_f64_retain(value)
        .map(|d| round_decimal(d, dp))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Convert a decimal fraction to a rounded percentage (0.0028 -> 0.28)
pub fn to_percent(fraction: f64, dp: u32) -> f64 {
    round_f64(fraction * 100.0, dp)
}

/// Fixed-point view of a float, rounded; `None` for NaN or infinities
pub fn f64_to_decimal(value: f64, dp: u32) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| round_decimal(d, dp))
}
