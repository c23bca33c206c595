use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::domain::amount::parse_raw_amount;
use crate::shared::constants::BPS_DENOMINATOR;
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;
use crate::shared::utils::{is_valid_address, serialize_opt_u256, serialize_u256};

/// Request for the token-launch quote API.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub sell_token: Token,
    pub buy_token: Token,
    pub sell_amount_raw: String,
    pub taker: String,
    pub fee_recipient: Option<String>,
    pub fee_bps: Option<u32>,
    pub fee_token: Option<String>,
    pub surplus_recipient: Option<String>,
}

impl QuoteRequest {
    pub fn new(
        sell_token: Token,
        buy_token: Token,
        sell_amount_raw: impl Into<String>,
        taker: impl Into<String>,
    ) -> Result<Self, QuoteError> {
        let sell_amount_raw = sell_amount_raw.into();
        let taker = taker.into();

        if sell_token.same_asset(&buy_token) {
            return Err(QuoteError::SameToken);
        }
        if parse_raw_amount(&sell_amount_raw)?.is_zero() {
            return Err(QuoteError::InvalidAmount(
                "sell amount must be greater than 0".to_string(),
            ));
        }
        check_address(&taker)?;

        Ok(Self {
            sell_token,
            buy_token,
            sell_amount_raw,
            taker,
            fee_recipient: None,
            fee_bps: None,
            fee_token: None,
            surplus_recipient: None,
        })
    }

    /// Attach an integrator fee taken from the trade.
    pub fn with_fee(
        mut self,
        recipient: impl Into<String>,
        fee_bps: u32,
        fee_token: Option<String>,
    ) -> Result<Self, QuoteError> {
        let recipient = recipient.into();
        check_address(&recipient)?;
        if fee_bps > BPS_DENOMINATOR {
            return Err(QuoteError::InvalidFeeBps(fee_bps));
        }
        if let Some(token) = &fee_token {
            check_address(token)?;
        }

        self.fee_recipient = Some(recipient);
        self.fee_bps = Some(fee_bps);
        self.fee_token = fee_token;
        Ok(self)
    }

    pub fn with_surplus_recipient(mut self, recipient: impl Into<String>) -> Result<Self, QuoteError> {
        let recipient = recipient.into();
        check_address(&recipient)?;
        self.surplus_recipient = Some(recipient);
        Ok(self)
    }

    pub fn chain_id(&self) -> u64 {
        self.sell_token.chain_id
    }

    /// Query parameters in the order the quote API documents them. A zero
    /// fee is left out entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("chainId", self.chain_id().to_string()),
            ("sellToken", self.sell_token.address.clone()),
            ("buyToken", self.buy_token.address.clone()),
            ("sellAmount", self.sell_amount_raw.clone()),
            ("taker", self.taker.clone()),
        ];

        if let Some(recipient) = &self.fee_recipient {
            pairs.push(("swapFeeRecipient", recipient.clone()));
        }
        if let Some(bps) = self.fee_bps.filter(|bps| *bps > 0) {
            pairs.push(("swapFeeBps", bps.to_string()));
        }
        if let Some(token) = &self.fee_token {
            pairs.push(("swapFeeToken", token.clone()));
        }
        if let Some(recipient) = &self.surplus_recipient {
            pairs.push(("tradeSurplusRecipient", recipient.clone()));
        }

        pairs
    }
}

fn check_address(address: &str) -> Result<(), QuoteError> {
    if is_valid_address(address) {
        Ok(())
    } else {
        Err(QuoteError::InvalidAddress(address.to_string()))
    }
}

/// Shape of a quote API response. Only the amounts are required; everything
/// else the API sends is kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub sell_amount: String,
    pub buy_amount: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RawQuote {
    /// Shape check. On failure the whole payload travels with the error.
    pub fn from_value(value: serde_json::Value) -> Result<Self, QuoteError> {
        serde_json::from_value::<RawQuote>(value.clone()).map_err(|e| QuoteError::MalformedQuote {
            reason: e.to_string(),
            raw: value,
        })
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Display strings produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDisplay {
    pub sell_amount: String,
    pub buy_amount: String,
    pub price_per_unit: String,
    pub inverse_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub sell_amount_raw: String,
    pub buy_amount_raw: String,
    pub sell_amount_decimal: f64,
    pub buy_amount_decimal: f64,
    /// Sell-token units paid per one buy-token unit.
    pub price_per_unit: f64,
    /// Buy-token units received per one sell-token unit.
    pub inverse_price: f64,
    #[serde(serialize_with = "serialize_opt_u256")]
    pub gas_estimate: Option<U256>,
    pub display: QuoteDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapType {
    ExactInput,
    ExactOutput,
}

/// What the on-chain quoter returns: `amountOut` for exact-input calls,
/// `amountIn` for exact-output calls, plus the gas estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnchainQuote {
    pub amount: U256,
    pub gas_estimate: U256,
}

/// Normalized on-chain quote with its slippage limit applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub swap_type: SwapType,
    #[serde(serialize_with = "serialize_u256")]
    pub amount_in: U256,
    #[serde(serialize_with = "serialize_u256")]
    pub amount_out: U256,
    pub amount_in_formatted: String,
    pub amount_out_formatted: String,
    /// Set for exact-input quotes.
    #[serde(serialize_with = "serialize_opt_u256")]
    pub amount_out_minimum: Option<U256>,
    /// Set for exact-output quotes.
    #[serde(serialize_with = "serialize_opt_u256")]
    pub amount_in_maximum: Option<U256>,
    pub limit_formatted: String,
    #[serde(serialize_with = "serialize_u256")]
    pub gas_estimate: U256,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{BASE_CHAIN_ID, NATIVE_TOKEN_ADDRESS};
    use serde_json::json;

    const TAKER: &str = "0x1eaf444ebDf6495C57aD52A04C61521bBf564ace";

    fn eth() -> Token {
        Token::new(NATIVE_TOKEN_ADDRESS, "ETH", 18, BASE_CHAIN_ID)
    }

    fn stk() -> Token {
        Token::new("0x9f86db9fc6f7c9408e8fda3ff8ce4e78ac7a6b07", "STK", 18, BASE_CHAIN_ID)
    }

    #[test]
    fn test_quote_request_query_pairs() {
        let request = QuoteRequest::new(eth(), stk(), "10000000000000000", TAKER)
            .unwrap()
            .with_fee(TAKER, 100, Some(NATIVE_TOKEN_ADDRESS.to_string()))
            .unwrap()
            .with_surplus_recipient(TAKER)
            .unwrap();

        let keys: Vec<&str> = request.to_query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec![
                "chainId",
                "sellToken",
                "buyToken",
                "sellAmount",
                "taker",
                "swapFeeRecipient",
                "swapFeeBps",
                "swapFeeToken",
                "tradeSurplusRecipient",
            ]
        );
        assert_eq!(request.to_query_pairs()[0].1, "8453");
    }

    #[test]
    fn test_zero_fee_bps_is_omitted() {
        let request = QuoteRequest::new(eth(), stk(), "1", TAKER)
            .unwrap()
            .with_fee(TAKER, 0, None)
            .unwrap();
        assert!(request.to_query_pairs().iter().all(|(k, _)| *k != "swapFeeBps"));
    }

    #[test]
    fn test_quote_request_invariants() {
        assert_eq!(
            QuoteRequest::new(eth(), eth(), "1", TAKER),
            Err(QuoteError::SameToken)
        );
        assert!(matches!(
            QuoteRequest::new(eth(), stk(), "0", TAKER),
            Err(QuoteError::InvalidAmount(_))
        ));
        assert!(matches!(
            QuoteRequest::new(eth(), stk(), "1.5", TAKER),
            Err(QuoteError::InvalidAmount(_))
        ));
        assert!(matches!(
            QuoteRequest::new(eth(), stk(), "1", "nobody"),
            Err(QuoteError::InvalidAddress(_))
        ));
        let request = QuoteRequest::new(eth(), stk(), "1", TAKER).unwrap();
        assert_eq!(
            request.with_fee(TAKER, 10_001, None),
            Err(QuoteError::InvalidFeeBps(10_001))
        );
    }

    #[test]
    fn test_raw_quote_keeps_extra_fields() {
        let value = json!({
            "sellAmount": "10000000000000000",
            "buyAmount": "52000000000000000000000",
            "gas": "210000",
            "liquidityAvailable": true,
            "route": {"fills": []}
        });
        let raw = RawQuote::from_value(value).unwrap();
        assert_eq!(raw.gas.as_deref(), Some("210000"));
        assert_eq!(raw.extra["liquidityAvailable"], json!(true));
        assert_eq!(raw.to_value()["route"], json!({"fills": []}));
    }

    #[test]
    fn test_raw_quote_null_gas_is_absent() {
        let raw = RawQuote::from_value(json!({
            "sellAmount": "1",
            "buyAmount": "2",
            "gas": null
        }))
        .unwrap();
        assert_eq!(raw.gas, None);
    }

    #[test]
    fn test_raw_quote_shape_errors_keep_payload() {
        let missing = json!({"sellAmount": "1", "liquidityAvailable": false});
        match RawQuote::from_value(missing.clone()) {
            Err(QuoteError::MalformedQuote { raw, .. }) => assert_eq!(raw, missing),
            other => panic!("unexpected: {:?}", other),
        }

        let numeric = json!({"sellAmount": "1", "buyAmount": 2});
        assert!(matches!(
            RawQuote::from_value(numeric),
            Err(QuoteError::MalformedQuote { .. })
        ));
    }
}
