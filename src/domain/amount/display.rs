//! Magnitude-aware number formatting.
//!
//! Prices here span well over twelve orders of magnitude, so one fixed number
//! of decimals either zeroes out small prices or prints long tails for large
//! ones. Every surface formats through [`format_for_display`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPolicy {
    /// Magnitudes strictly below this render in scientific notation.
    pub scientific_below: f64,
    /// Mantissa fraction digits kept (truncated) in scientific notation.
    pub scientific_digits: usize,
    /// Max fraction digits for magnitudes below 1.
    pub small_value_digits: usize,
    /// Max fraction digits for magnitudes of 1 and above.
    pub large_value_digits: usize,
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            scientific_below: 1e-6,
            scientific_digits: 4,
            small_value_digits: 8,
            large_value_digits: 6,
        }
    }
}

pub fn format_for_display(value: f64, policy: &DisplayPolicy) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if magnitude < policy.scientific_below {
        return truncated_scientific(value, policy.scientific_digits);
    }

    let digits = if magnitude < 1.0 {
        policy.small_value_digits
    } else {
        policy.large_value_digits
    };
    strip_trailing_zeros(format!("{:.*}", digits, value))
}

fn truncated_scientific(value: f64, digits: usize) -> String {
    let rendered = format!("{:.15e}", value);
    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return rendered;
    };
    let (whole, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let kept: String = frac.chars().take(digits).collect();
    let kept = kept.trim_end_matches('0');

    if kept.is_empty() {
        format!("{}e{}", whole, exponent)
    } else {
        format!("{}.{}e{}", whole, kept, exponent)
    }
}

fn strip_trailing_zeros(rendered: String) -> String {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
