// src/math.rs
use alloy_primitives::U256;

use crate::shared::constants::BPS_DENOMINATOR;
use crate::shared::errors::QuoteError;

/// Reject slippage outside [0, 10000] bps
pub fn check_slippage_bps(slippage_bps: u32) -> Result<(), QuoteError> {
    if slippage_bps > BPS_DENOMINATOR {
        return Err(QuoteError::InvalidSlippage(slippage_bps));
    }
    Ok(())
}

/// Calculate minimum output amount with slippage protection
///
/// `floor(quoted * (10000 - slippage) / 10000)`. Used for exact-input swaps.
pub fn minimum_amount_out(quoted_amount_out: U256, slippage_bps: u32) -> Result<U256, QuoteError> {
    check_slippage_bps(slippage_bps)?;
    mul_bps_floor(quoted_amount_out, BPS_DENOMINATOR - slippage_bps)
        .ok_or_else(|| QuoteError::InvalidAmount(format!("{} overflows", quoted_amount_out)))
}

/// Calculate maximum input amount with slippage protection
///
/// `floor(quoted * (10000 + slippage) / 10000)`. Used for exact-output swaps;
/// slippage raises the input ceiling where it lowers the output floor.
pub fn maximum_amount_in(quoted_amount_in: U256, slippage_bps: u32) -> Result<U256, QuoteError> {
    check_slippage_bps(slippage_bps)?;
    mul_bps_floor(quoted_amount_in, BPS_DENOMINATOR + slippage_bps).ok_or_else(|| {
        QuoteError::InvalidAmount(format!(
            "{} plus {} bps exceeds 256 bits",
            quoted_amount_in, slippage_bps
        ))
    })
}

/// `floor(amount * factor / 10000)` without the intermediate product overflowing.
fn mul_bps_floor(amount: U256, factor_bps: u32) -> Option<U256> {
    let denominator = U256::from(BPS_DENOMINATOR);
    let factor = U256::from(factor_bps);

    let whole = (amount / denominator).checked_mul(factor)?;
    // remainder < 10000 and factor <= 20000, so this product is small
    let rest = (amount % denominator) * factor / denominator;
    whole.checked_add(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_amount_out_half_percent() {
        let min_out = minimum_amount_out(U256::from(1_000_000u64), 50).unwrap();
        assert_eq!(min_out, U256::from(995_000u64));
    }

    #[test]
    fn test_maximum_amount_in_half_percent() {
        let max_in = maximum_amount_in(U256::from(1_000_000u64), 50).unwrap();
        assert_eq!(max_in, U256::from(1_005_000u64));
    }

    #[test]
    fn test_slippage_boundaries() {
        let x = U256::from(123_456_789u64);
        assert_eq!(minimum_amount_out(x, 0).unwrap(), x);
        assert_eq!(minimum_amount_out(x, 10_000).unwrap(), U256::ZERO);
        assert_eq!(maximum_amount_in(x, 0).unwrap(), x);
        assert_eq!(maximum_amount_in(x, 10_000).unwrap(), x * U256::from(2u64));
    }

    #[test]
    fn test_rounding_is_floor() {
        // 999 * 9950 / 10000 = 994.005
        assert_eq!(minimum_amount_out(U256::from(999u64), 50).unwrap(), U256::from(994u64));
        // 999 * 10050 / 10000 = 1003.995
        assert_eq!(maximum_amount_in(U256::from(999u64), 50).unwrap(), U256::from(1003u64));
    }

    #[test]
    fn test_slippage_monotonicity() {
        let quoted = U256::from(987_654_321_987_654_321u128);
        let mut last_min = quoted;
        let mut last_max = quoted;
        for bps in (0..=10_000u32).step_by(125) {
            let min_out = minimum_amount_out(quoted, bps).unwrap();
            let max_in = maximum_amount_in(quoted, bps).unwrap();
            assert!(min_out <= last_min, "min out increased at {} bps", bps);
            assert!(max_in >= last_max, "max in decreased at {} bps", bps);
            last_min = min_out;
            last_max = max_in;
        }
    }

    #[test]
    fn test_invalid_slippage() {
        assert_eq!(
            minimum_amount_out(U256::from(1u64), 10_001),
            Err(QuoteError::InvalidSlippage(10_001))
        );
        assert_eq!(
            maximum_amount_in(U256::from(1u64), 20_000),
            Err(QuoteError::InvalidSlippage(20_000))
        );
    }

    #[test]
    fn test_full_width_amounts() {
        assert_eq!(minimum_amount_out(U256::MAX, 0).unwrap(), U256::MAX);
        assert!(minimum_amount_out(U256::MAX, 50).unwrap() < U256::MAX);
        assert!(matches!(
            maximum_amount_in(U256::MAX, 1),
            Err(QuoteError::InvalidAmount(_))
        ));
    }
}
