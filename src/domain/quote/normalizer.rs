//! Reduce raw quote responses to rates and display strings.
//!
//! Nothing in here logs or retries. A response that cannot be turned into a
//! correct number fails with a specific [`QuoteError`] instead of being
//! coerced to zero.

use alloy_primitives::U256;

use super::types::{OnchainQuote, QuoteDisplay, QuoteResult, RawQuote, SwapQuote, SwapType};
use crate::domain::amount::{format_for_display, parse_raw_amount, u256_to_decimal, DisplayPolicy};
use crate::math::{maximum_amount_in, minimum_amount_out};
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;

/// Normalizes quotes for one display policy.
#[derive(Debug, Clone, Default)]
pub struct QuoteNormalizer {
    policy: DisplayPolicy,
}

impl QuoteNormalizer {
    pub fn new(policy: DisplayPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &DisplayPolicy {
        &self.policy
    }

    /// Shape-check an untyped API response and normalize it.
    pub fn normalize_response(
        &self,
        response: serde_json::Value,
        sell_token: &Token,
        buy_token: &Token,
    ) -> Result<QuoteResult, QuoteError> {
        let raw = RawQuote::from_value(response)?;
        self.normalize(&raw, sell_token.decimals, buy_token.decimals)
    }

    pub fn normalize(
        &self,
        raw: &RawQuote,
        sell_decimals: u8,
        buy_decimals: u8,
    ) -> Result<QuoteResult, QuoteError> {
        let sell_amount = parse_raw_amount(&raw.sell_amount)?;
        let buy_amount = parse_raw_amount(&raw.buy_amount)?;

        if buy_amount.is_zero() {
            return Err(QuoteError::NoLiquidity);
        }
        if sell_amount.is_zero() {
            return Err(QuoteError::InvalidAmount(
                "quote reports a zero sell amount".to_string(),
            ));
        }

        let gas_estimate = match &raw.gas {
            Some(gas) => Some(parse_raw_amount(gas).map_err(|e| QuoteError::MalformedQuote {
                reason: format!("gas: {}", e),
                raw: raw.to_value(),
            })?),
            None => None,
        };

        let sell_amount_decimal = u256_to_decimal(sell_amount, sell_decimals)?;
        let buy_amount_decimal = u256_to_decimal(buy_amount, buy_decimals)?;

        let price_per_unit = sell_amount_decimal / buy_amount_decimal;
        let inverse_price = 1.0 / price_per_unit;

        // decimals far apart push the ratio past the f64 range
        if !is_usable_rate(price_per_unit) || !is_usable_rate(inverse_price) {
            return Err(QuoteError::InvalidAmount(format!(
                "rate of {} / {} is outside double precision",
                raw.sell_amount, raw.buy_amount
            )));
        }

        Ok(QuoteResult {
            sell_amount_raw: sell_amount.to_string(),
            buy_amount_raw: buy_amount.to_string(),
            sell_amount_decimal,
            buy_amount_decimal,
            price_per_unit,
            inverse_price,
            gas_estimate,
            display: QuoteDisplay {
                sell_amount: self.format(sell_amount_decimal),
                buy_amount: self.format(buy_amount_decimal),
                price_per_unit: self.format(price_per_unit),
                inverse_price: self.format(inverse_price),
            },
        })
    }

    /// Normalize an exact-input quoter result. `amount_in` is the exact
    /// input that was quoted.
    pub fn normalize_exact_input(
        &self,
        amount_in: U256,
        quote: &OnchainQuote,
        token_in: &Token,
        token_out: &Token,
        slippage_bps: u32,
    ) -> Result<SwapQuote, QuoteError> {
        if quote.amount.is_zero() {
            return Err(QuoteError::NoLiquidity);
        }
        let minimum = minimum_amount_out(quote.amount, slippage_bps)?;

        Ok(SwapQuote {
            swap_type: SwapType::ExactInput,
            amount_in,
            amount_out: quote.amount,
            amount_in_formatted: self.format_amount(amount_in, token_in)?,
            amount_out_formatted: self.format_amount(quote.amount, token_out)?,
            amount_out_minimum: Some(minimum),
            amount_in_maximum: None,
            limit_formatted: self.format_amount(minimum, token_out)?,
            gas_estimate: quote.gas_estimate,
        })
    }

    /// Normalize an exact-output quoter result. `amount_out` is the exact
    /// output that was requested.
    pub fn normalize_exact_output(
        &self,
        amount_out: U256,
        quote: &OnchainQuote,
        token_in: &Token,
        token_out: &Token,
        slippage_bps: u32,
    ) -> Result<SwapQuote, QuoteError> {
        if quote.amount.is_zero() {
            return Err(QuoteError::NoLiquidity);
        }
        let maximum = maximum_amount_in(quote.amount, slippage_bps)?;

        Ok(SwapQuote {
            swap_type: SwapType::ExactOutput,
            amount_in: quote.amount,
            amount_out,
            amount_in_formatted: self.format_amount(quote.amount, token_in)?,
            amount_out_formatted: self.format_amount(amount_out, token_out)?,
            amount_out_minimum: None,
            amount_in_maximum: Some(maximum),
            limit_formatted: self.format_amount(maximum, token_in)?,
            gas_estimate: quote.gas_estimate,
        })
    }

    pub fn format(&self, value: f64) -> String {
        format_for_display(value, &self.policy)
    }

    pub fn format_amount(&self, amount: U256, token: &Token) -> Result<String, QuoteError> {
        Ok(self.format(u256_to_decimal(amount, token.decimals)?))
    }
}

fn is_usable_rate(rate: f64) -> bool {
    rate.is_finite() && rate > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{BASE_CHAIN_ID, NATIVE_TOKEN_ADDRESS, USDC_ADDRESS};
    use serde_json::json;

    fn eth() -> Token {
        Token::new(NATIVE_TOKEN_ADDRESS, "ETH", 18, BASE_CHAIN_ID)
    }

    fn usdc() -> Token {
        Token::new(USDC_ADDRESS, "USDC", 6, BASE_CHAIN_ID)
    }

    fn meme() -> Token {
        Token::new("0x9f86db9fc6f7c9408e8fda3ff8ce4e78ac7a6b07", "STK", 18, BASE_CHAIN_ID)
    }

    fn raw(sell: &str, buy: &str, gas: Option<&str>) -> RawQuote {
        RawQuote {
            sell_amount: sell.to_string(),
            buy_amount: buy.to_string(),
            gas: gas.map(str::to_string),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_meme_token_quote() {
        // 0.01 ETH buys 52,000 STK
        let normalizer = QuoteNormalizer::default();
        let result = normalizer
            .normalize_response(
                json!({
                    "sellAmount": "10000000000000000",
                    "buyAmount": "52000000000000000000000",
                    "gas": "185000"
                }),
                &eth(),
                &meme(),
            )
            .unwrap();

        assert_eq!(result.sell_amount_decimal, 0.01);
        assert_eq!(result.buy_amount_decimal, 52_000.0);
        assert!((result.price_per_unit - 0.01 / 52_000.0).abs() < 1e-20);
        assert!((result.inverse_price - 5_200_000.0).abs() < 1e-6);
        assert_eq!(result.gas_estimate, Some(U256::from(185_000u64)));
        assert_eq!(result.display.price_per_unit, "1.923e-7");
        assert_eq!(result.display.inverse_price, "5200000");
        assert_eq!(result.display.buy_amount, "52000");
        assert_eq!(result.display.sell_amount, "0.01");
    }

    #[test]
    fn test_mixed_decimals() {
        // 1 ETH -> 3,250.5 USDC
        let result = QuoteNormalizer::default()
            .normalize(&raw("1000000000000000000", "3250500000", None), 18, 6)
            .unwrap();
        assert_eq!(result.buy_amount_decimal, 3_250.5);
        assert_eq!(result.gas_estimate, None);
        assert_eq!(result.display.inverse_price, "3250.5");
        assert_eq!(result.display.price_per_unit, "0.00030764");
    }

    #[test]
    fn test_zero_output_is_no_liquidity() {
        let result = QuoteNormalizer::default().normalize(&raw("1000000000000000000", "0", None), 18, 18);
        assert_eq!(result, Err(QuoteError::NoLiquidity));
    }

    #[test]
    fn test_zero_sell_amount_rejected() {
        let result = QuoteNormalizer::default().normalize(&raw("0", "100", None), 18, 18);
        assert!(matches!(result, Err(QuoteError::InvalidAmount(_))));
    }

    #[test]
    fn test_missing_field_is_malformed_not_zero() {
        let payload = json!({"sellAmount": "1000", "gas": "21000"});
        let result = QuoteNormalizer::default().normalize_response(payload.clone(), &eth(), &usdc());
        match result {
            Err(QuoteError::MalformedQuote { raw, .. }) => assert_eq!(raw, payload),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_bad_gas_is_malformed() {
        let result = QuoteNormalizer::default().normalize(&raw("1", "1", Some("lots")), 18, 18);
        match result {
            Err(QuoteError::MalformedQuote { raw, .. }) => assert_eq!(raw["gas"], json!("lots")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_rate_overflow_is_invalid() {
        let huge = format!("1{}", "0".repeat(77));
        let normalizer = QuoteNormalizer::default();

        let result = normalizer.normalize(&raw(&huge, "1", None), 0, 255);
        assert!(matches!(result, Err(QuoteError::InvalidAmount(_))));

        let result = normalizer.normalize(&raw("1", &huge, None), 255, 0);
        assert!(matches!(result, Err(QuoteError::InvalidAmount(_))));
    }

    #[test]
    fn test_non_integer_amount_is_invalid() {
        let result = QuoteNormalizer::default().normalize(&raw("1.5", "1", None), 18, 18);
        assert!(matches!(result, Err(QuoteError::InvalidAmount(_))));
    }

    #[test]
    fn test_exact_input_onchain_quote() {
        let quote = OnchainQuote {
            amount: U256::from(3_250_500_000u64),
            gas_estimate: U256::from(120_000u64),
        };
        let swap = QuoteNormalizer::default()
            .normalize_exact_input(U256::from(1_000_000_000_000_000_000u64), &quote, &eth(), &usdc(), 50)
            .unwrap();

        assert_eq!(swap.swap_type, SwapType::ExactInput);
        assert_eq!(swap.amount_out_minimum, Some(U256::from(3_234_247_500u64)));
        assert_eq!(swap.amount_in_maximum, None);
        assert_eq!(swap.amount_in_formatted, "1");
        assert_eq!(swap.amount_out_formatted, "3250.5");
        assert_eq!(swap.limit_formatted, "3234.2475");
    }

    #[test]
    fn test_exact_output_onchain_quote() {
        let quote = OnchainQuote {
            amount: U256::from(1_000_000_000_000_000u64),
            gas_estimate: U256::from(130_000u64),
        };
        let swap = QuoteNormalizer::default()
            .normalize_exact_output(U256::from(3_000_000u64), &quote, &eth(), &usdc(), 100)
            .unwrap();

        assert_eq!(swap.swap_type, SwapType::ExactOutput);
        assert_eq!(swap.amount_in_maximum, Some(U256::from(1_010_000_000_000_000u64)));
        assert_eq!(swap.amount_out_minimum, None);
        assert_eq!(swap.amount_out_formatted, "3");
        assert_eq!(swap.limit_formatted, "0.00101");
    }

    #[test]
    fn test_onchain_zero_is_no_liquidity() {
        let quote = OnchainQuote {
            amount: U256::ZERO,
            gas_estimate: U256::ZERO,
        };
        let normalizer = QuoteNormalizer::default();
        assert_eq!(
            normalizer.normalize_exact_input(U256::from(1u64), &quote, &eth(), &usdc(), 50),
            Err(QuoteError::NoLiquidity)
        );
        assert_eq!(
            normalizer.normalize_exact_output(U256::from(1u64), &quote, &eth(), &usdc(), 50),
            Err(QuoteError::NoLiquidity)
        );
    }
}
