//! Common types used across the application

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use crate::shared::constants::NATIVE_TOKEN_ADDRESS;
use crate::shared::errors::QuoteError;
use crate::shared::utils::parse_address;

/// Token representation
///
/// The address is kept exactly as supplied (it may be checksummed) but every
/// comparison goes through the lower-cased form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    pub chain_id: u64,
}

impl Token {
    pub fn new(
        address: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        chain_id: u64,
    ) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
            chain_id,
        }
    }

    pub fn canonical_address(&self) -> String {
        self.address.to_lowercase()
    }

    pub fn parsed_address(&self) -> Result<Address, QuoteError> {
        parse_address(&self.address)
    }

    /// True for the zero-address sentinel used for the chain's native asset.
    pub fn is_native(&self) -> bool {
        self.canonical_address() == NATIVE_TOKEN_ADDRESS
    }

    pub fn same_asset(&self, other: &Token) -> bool {
        self.canonical_address() == other.canonical_address()
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.same_asset(other)
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.canonical_address().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::BASE_CHAIN_ID;

    #[test]
    fn test_token_equality_ignores_case() {
        let checksummed = Token::new(
            "0x833589fCD6eDb6E08f4c7c32D4f71b54Bda02913",
            "USDC",
            6,
            BASE_CHAIN_ID,
        );
        let lower = Token::new(
            "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913",
            "usdc",
            6,
            BASE_CHAIN_ID,
        );
        assert_eq!(checksummed, lower);
        assert!(checksummed.same_asset(&lower));
    }

    #[test]
    fn test_native_sentinel() {
        let eth = Token::new(NATIVE_TOKEN_ADDRESS, "ETH", 18, BASE_CHAIN_ID);
        assert!(eth.is_native());
        assert!(eth.parsed_address().unwrap().is_zero());
    }
}
