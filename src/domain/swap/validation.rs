use super::FeeTier;
use crate::math::check_slippage_bps;
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;
use crate::shared::utils::is_valid_address;

/// Check a swap intent without touching the network.
///
/// Rules are checked in order and the first violation is returned; `None`
/// means the intent can be sent to a quoter.
pub fn validate_swap_intent(
    token_in: &Token,
    token_out: &Token,
    amount_in: f64,
    fee: u32,
    slippage_bps: u32,
) -> Option<QuoteError> {
    for token in [token_in, token_out] {
        if !is_valid_address(&token.address) {
            return Some(QuoteError::InvalidAddress(token.address.clone()));
        }
    }

    if token_in.same_asset(token_out) {
        return Some(QuoteError::SameToken);
    }

    if !amount_in.is_finite() || amount_in <= 0.0 {
        return Some(QuoteError::InvalidAmount(format!(
            "amount must be greater than 0, got {}",
            amount_in
        )));
    }

    if let Err(err) = FeeTier::try_from(fee) {
        return Some(err);
    }

    check_slippage_bps(slippage_bps).err()
}
