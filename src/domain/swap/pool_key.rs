use alloy_primitives::{keccak256, Address, B256};
use serde::Serialize;

use super::FeeTier;
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;
use crate::shared::utils::{format_address, serialize_address};

/// Canonical V4 pool identifier. `currency0` is always the numerically lower
/// address, which is the order the pool manager indexes pools by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolKey {
    #[serde(serialize_with = "serialize_address")]
    pub currency0: Address,
    #[serde(serialize_with = "serialize_address")]
    pub currency1: Address,
    pub fee: FeeTier,
    pub tick_spacing: i32,
    #[serde(serialize_with = "serialize_address")]
    pub hooks: Address,
}

impl PoolKey {
    /// keccak256 of the ABI-encoded key (five 32-byte words).
    pub fn pool_id(&self) -> B256 {
        let mut encoded = Vec::with_capacity(5 * 32);
        encoded.extend_from_slice(self.currency0.into_word().as_slice());
        encoded.extend_from_slice(self.currency1.into_word().as_slice());
        encoded.extend_from_slice(&int_word(self.fee.as_u32() as i32));
        encoded.extend_from_slice(&int_word(self.tick_spacing));
        encoded.extend_from_slice(self.hooks.into_word().as_slice());
        keccak256(&encoded)
    }

    pub fn has_hooks(&self) -> bool {
        !self.hooks.is_zero()
    }
}

/// Sign-extended big-endian 32-byte word.
fn int_word(value: i32) -> [u8; 32] {
    let fill = if value < 0 { 0xff } else { 0x00 };
    let mut word = [fill; 32];
    word[28..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Build the pool key for a token pair. Argument order does not matter.
pub fn build_pool_key(
    token_a: &Token,
    token_b: &Token,
    fee: u32,
    hooks: Option<Address>,
) -> Result<PoolKey, QuoteError> {
    let fee = FeeTier::try_from(fee)?;
    let address_a = token_a.parsed_address()?;
    let address_b = token_b.parsed_address()?;
    if address_a == address_b {
        return Err(QuoteError::SameToken);
    }

    // byte order on addresses is the same as lower-case hex string order
    let (currency0, currency1) = if address_a < address_b {
        (address_a, address_b)
    } else {
        (address_b, address_a)
    };

    Ok(PoolKey {
        currency0,
        currency1,
        fee,
        tick_spacing: fee.tick_spacing(),
        hooks: hooks.unwrap_or(Address::ZERO),
    })
}

/// True iff selling `sell_token` moves currency0 into the pool.
pub fn zero_for_one(sell_token: &Token, pool_key: &PoolKey) -> bool {
    sell_token.canonical_address() == format_address(&pool_key.currency0)
}

/// The pair in pool order.
pub fn token_order<'a>(token_a: &'a Token, token_b: &'a Token) -> (&'a Token, &'a Token) {
    if token_a.canonical_address() < token_b.canonical_address() {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    }
}
