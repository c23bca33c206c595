//! Conversion between raw integer amounts (smallest token unit) and decimal values.
//!
//! Both directions work on decimal digit strings so the only rounding that
//! happens is the single IEEE-754 conversion at the end. Going from decimal to
//! raw truncates anything finer than one raw unit.

use alloy_primitives::U256;

use crate::shared::errors::QuoteError;

/// Parse a base-10, non-negative integer string into a 256-bit amount.
pub fn parse_raw_amount(raw: &str) -> Result<U256, QuoteError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QuoteError::InvalidAmount(format!(
            "not a non-negative integer: {:?}",
            raw
        )));
    }

    U256::from_str_radix(raw, 10)
        .map_err(|_| QuoteError::InvalidAmount(format!("{} exceeds 256 bits", raw)))
}

/// `raw / 10^decimals` as a float.
pub fn to_decimal(raw: &str, decimals: u8) -> Result<f64, QuoteError> {
    let value = parse_raw_amount(raw)?;
    u256_to_decimal(value, decimals)
}

pub fn u256_to_decimal(value: U256, decimals: u8) -> Result<f64, QuoteError> {
    let shifted = insert_decimal_point(&value.to_string(), decimals as usize);
    shifted
        .parse::<f64>()
        .map_err(|e| QuoteError::InvalidAmount(format!("{}: {}", shifted, e)))
}

/// `decimal * 10^decimals`, truncated, as a raw integer string.
///
/// The float is rendered with its shortest round-trip representation before
/// the point is moved, so `to_raw(to_decimal("1", 18)?, 18)` yields `"1"`
/// rather than losing the unit to binary noise. Fractional digits beyond
/// `decimals` are dropped.
pub fn to_raw(decimal: f64, decimals: u8) -> Result<String, QuoteError> {
    if !decimal.is_finite() {
        return Err(QuoteError::InvalidAmount(format!(
            "amount must be finite, got {}",
            decimal
        )));
    }
    if decimal < 0.0 {
        return Err(QuoteError::InvalidAmount(format!(
            "amount must be non-negative, got {}",
            decimal
        )));
    }

    // -0.0 renders as "-0"
    let decimal = if decimal == 0.0 { 0.0 } else { decimal };
    let rendered = decimal.to_string();
    let (int_part, frac_part) = rendered
        .split_once('.')
        .unwrap_or((rendered.as_str(), ""));

    let width = decimals as usize;
    let frac: String = frac_part.chars().take(width).collect();
    let digits = format!("{}{:0<width$}", int_part, frac, width = width);

    let value = U256::from_str_radix(&digits, 10).map_err(|_| {
        QuoteError::InvalidAmount(format!(
            "{} with {} decimals exceeds 256 bits",
            decimal, decimals
        ))
    })?;

    Ok(value.to_string())
}

fn insert_decimal_point(digits: &str, decimals: usize) -> String {
    if decimals == 0 {
        return digits.to_string();
    }
    if digits.len() > decimals {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        format!("{}.{}", int_part, frac_part)
    } else {
        format!("0.{:0>width$}", digits, width = decimals)
    }
}
