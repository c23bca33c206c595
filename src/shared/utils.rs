//! Utility functions and helpers

use alloy_primitives::{Address, U256};
use serde::Serializer;

use crate::shared::errors::QuoteError;

/// `0x` followed by exactly 40 hex digits, any case.
pub fn is_valid_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(digits) => digits.len() == 40 && digits.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

pub fn parse_address(address: &str) -> Result<Address, QuoteError> {
    if !is_valid_address(address) {
        return Err(QuoteError::InvalidAddress(address.to_string()));
    }
    address
        .parse::<Address>()
        .map_err(|_| QuoteError::InvalidAddress(address.to_string()))
}

/// Lower-case `0x`-prefixed hex, the form pool keys are compared in.
pub fn format_address(address: &Address) -> String {
    format!("0x{}", hex::encode(address.as_slice()))
}

/// Shortened form for log lines.
pub fn short_address(address: &str) -> String {
    if address.len() <= 12 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

pub fn serialize_address<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_address(address))
}

/// Raw amounts are shown as base-10 strings, never as JSON numbers.
pub fn serialize_u256<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub fn serialize_opt_u256<S: Serializer>(
    value: &Option<U256>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&v.to_string()),
        None => serializer.serialize_none(),
    }
}
