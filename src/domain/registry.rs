//! Token registry - resolves symbols and addresses to `Token` identities

use std::collections::HashMap;

use crate::shared::constants::{BASE_CHAIN_ID, NATIVE_TOKEN_ADDRESS, USDC_ADDRESS, WETH_ADDRESS};
use crate::shared::types::Token;

#[derive(Debug, Clone, Default)]
pub struct TokenRegistry {
    tokens: Vec<Token>,
    by_symbol: HashMap<String, usize>,
    by_address: HashMap<String, usize>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// ETH, WETH and USDC on Base.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.insert(Token::new(NATIVE_TOKEN_ADDRESS, "ETH", 18, BASE_CHAIN_ID));
        registry.insert(Token::new(WETH_ADDRESS, "WETH", 18, BASE_CHAIN_ID));
        registry.insert(Token::new(USDC_ADDRESS, "USDC", 6, BASE_CHAIN_ID));
        registry
    }

    /// Adds or replaces a token. A later token with the same symbol or
    /// address wins the lookup; a replaced token's old symbol is forgotten.
    pub fn insert(&mut self, token: Token) {
        let index = match self.by_address.get(&token.canonical_address()) {
            Some(&existing) => {
                let old_symbol = self.tokens[existing].symbol.to_lowercase();
                if self.by_symbol.get(&old_symbol) == Some(&existing) {
                    self.by_symbol.remove(&old_symbol);
                }
                self.tokens[existing] = token.clone();
                existing
            }
            None => {
                self.tokens.push(token.clone());
                self.tokens.len() - 1
            }
        };
        self.by_symbol.insert(token.symbol.to_lowercase(), index);
        self.by_address.insert(token.canonical_address(), index);
    }

    pub fn by_symbol(&self, symbol: &str) -> Option<&Token> {
        self.by_symbol
            .get(&symbol.to_lowercase())
            .map(|&index| &self.tokens[index])
    }

    pub fn by_address(&self, address: &str) -> Option<&Token> {
        self.by_address
            .get(&address.to_lowercase())
            .map(|&index| &self.tokens[index])
    }

    /// Addresses (`0x...`) are looked up as addresses, anything else as a symbol.
    pub fn resolve(&self, symbol_or_address: &str) -> Option<&Token> {
        if symbol_or_address.starts_with("0x") {
            self.by_address(symbol_or_address)
        } else {
            self.by_symbol(symbol_or_address)
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_case_insensitively() {
        let registry = TokenRegistry::with_defaults();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve("usdc").unwrap().decimals, 6);
        assert_eq!(
            registry
                .resolve("0x833589FCD6EDB6E08F4C7C32D4F71B54BDA02913")
                .unwrap()
                .symbol,
            "USDC"
        );
        assert!(registry.resolve("eth").unwrap().is_native());
        assert!(registry.resolve("DOGE").is_none());
    }

    #[test]
    fn test_insert_replaces_same_address() {
        let mut registry = TokenRegistry::with_defaults();
        registry.insert(Token::new(USDC_ADDRESS.to_lowercase(), "USDbC", 6, BASE_CHAIN_ID));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.by_address(USDC_ADDRESS).unwrap().symbol, "USDbC");
        assert_eq!(registry.by_symbol("usdbc").unwrap().decimals, 6);
        assert!(registry.by_symbol("usdc").is_none());
        assert!(registry.resolve("USDC").is_none());
    }

    #[test]
    fn test_reinsert_same_symbol_keeps_lookup() {
        let mut registry = TokenRegistry::with_defaults();
        registry.insert(Token::new(USDC_ADDRESS, "USDC", 6, BASE_CHAIN_ID));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.by_symbol("usdc").unwrap().symbol, "USDC");
    }
}
