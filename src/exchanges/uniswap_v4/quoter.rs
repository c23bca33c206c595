use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::quote::{OnchainQuote, QuoteNormalizer, SwapQuote};
use crate::domain::swap::{
    create_exact_output_params, create_swap_params, ExactOutputParams, QuoteParams, SwapParams,
};
use crate::shared::errors::{AppError, QuoteError};

/// Access to the V4 quoter contract. Implementations simulate the swap
/// against a single pool and report the other side of the trade.
#[async_trait]
pub trait PoolQuoter: Send + Sync {
    /// `params.amount_in` is the exact input; returns the output amount.
    async fn quote_exact_input_single(&self, params: &SwapParams) -> Result<OnchainQuote, AppError>;

    /// `params.amount_out` is the exact output; returns the required input.
    async fn quote_exact_output_single(&self, params: &ExactOutputParams) -> Result<OnchainQuote, AppError>;
}

/// Validates intents, queries the quoter and normalizes the answer.
pub struct V4QuoteService<Q> {
    quoter: Q,
    normalizer: QuoteNormalizer,
    deadline_minutes: i64,
}

impl<Q: PoolQuoter> V4QuoteService<Q> {
    pub fn new(quoter: Q, normalizer: QuoteNormalizer, deadline_minutes: i64) -> Self {
        Self {
            quoter,
            normalizer,
            deadline_minutes,
        }
    }

    pub async fn quote_exact_input(&self, params: &QuoteParams) -> Result<SwapQuote, AppError> {
        let swap = create_swap_params(params, Utc::now(), self.deadline_minutes)?;
        info!(
            "Quoting exact input {} {} -> {} (fee {})",
            params.amount, params.token_in.symbol, params.token_out.symbol, params.fee
        );

        let quote = self.quoter.quote_exact_input_single(&swap).await?;
        debug!("Quoter returned {} out, gas {}", quote.amount, quote.gas_estimate);

        let quote = self.normalizer.normalize_exact_input(
            swap.exact_amount()?,
            &quote,
            &params.token_in,
            &params.token_out,
            params.effective_slippage_bps(),
        )?;
        Ok(quote)
    }

    pub async fn quote_exact_output(&self, params: &QuoteParams) -> Result<SwapQuote, AppError> {
        let swap = create_exact_output_params(params, Utc::now(), self.deadline_minutes)?;
        info!(
            "Quoting exact output {} {} <- {} (fee {})",
            params.amount, params.token_out.symbol, params.token_in.symbol, params.fee
        );

        let quote = self.quoter.quote_exact_output_single(&swap).await?;
        debug!("Quoter requires {} in, gas {}", quote.amount, quote.gas_estimate);

        let quote = self.normalizer.normalize_exact_output(
            swap.exact_amount()?,
            &quote,
            &params.token_in,
            &params.token_out,
            params.effective_slippage_bps(),
        )?;
        Ok(quote)
    }

    /// A pool exists if one whole `token_in` can be quoted through it.
    pub async fn pool_exists(&self, params: &QuoteParams) -> bool {
        let one_unit = QuoteParams {
            amount: 1.0,
            ..params.clone()
        };
        match self.quote_exact_input(&one_unit).await {
            Ok(_) => true,
            Err(e) => {
                warn!(
                    "No usable pool for {}/{} at fee {}: {}",
                    params.token_in.symbol, params.token_out.symbol, params.fee, e
                );
                false
            }
        }
    }

    /// Exact-input swap parameters with the minimum output taken from a
    /// fresh quote.
    pub async fn build_swap(&self, params: &QuoteParams) -> Result<SwapParams, AppError> {
        let swap = create_swap_params(params, Utc::now(), self.deadline_minutes)?;
        let quote = self.quoter.quote_exact_input_single(&swap).await?;
        if quote.amount.is_zero() {
            return Err(QuoteError::NoLiquidity.into());
        }
        let swap = swap.with_quoted_amount_out(quote.amount, params.effective_slippage_bps())?;
        debug!("Built swap {} -> min {}", swap.amount_in, swap.amount_out_minimum);
        Ok(swap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{BASE_CHAIN_ID, NATIVE_TOKEN_ADDRESS, USDC_ADDRESS};
    use crate::shared::types::Token;
    use alloy_primitives::U256;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Prices every pool at 3,250.5 USDC per ETH.
    struct FixedRateQuoter {
        calls: Arc<AtomicUsize>,
        out: U256,
    }

    #[async_trait]
    impl PoolQuoter for FixedRateQuoter {
        async fn quote_exact_input_single(&self, _params: &SwapParams) -> Result<OnchainQuote, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OnchainQuote {
                amount: self.out,
                gas_estimate: U256::from(120_000u64),
            })
        }

        async fn quote_exact_output_single(&self, params: &ExactOutputParams) -> Result<OnchainQuote, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // 1 ETH per 3250.5 USDC requested
            let out = params.exact_amount()?;
            Ok(OnchainQuote {
                amount: out * U256::from(1_000_000_000_000_000_000u64) / U256::from(3_250_500_000u64),
                gas_estimate: U256::from(130_000u64),
            })
        }
    }

    struct RevertingQuoter;

    #[async_trait]
    impl PoolQuoter for RevertingQuoter {
        async fn quote_exact_input_single(&self, _params: &SwapParams) -> Result<OnchainQuote, AppError> {
            Err(AppError::QuoterError("execution reverted".to_string()))
        }

        async fn quote_exact_output_single(&self, _params: &ExactOutputParams) -> Result<OnchainQuote, AppError> {
            Err(AppError::QuoterError("execution reverted".to_string()))
        }
    }

    fn eth() -> Token {
        Token::new(NATIVE_TOKEN_ADDRESS, "ETH", 18, BASE_CHAIN_ID)
    }

    fn usdc() -> Token {
        Token::new(USDC_ADDRESS, "USDC", 6, BASE_CHAIN_ID)
    }

    fn service(out: u64) -> (V4QuoteService<FixedRateQuoter>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let quoter = FixedRateQuoter {
            calls: Arc::clone(&calls),
            out: U256::from(out),
        };
        (V4QuoteService::new(quoter, QuoteNormalizer::default(), 20), calls)
    }

    #[tokio::test]
    async fn test_quote_exact_input() {
        let (service, calls) = service(3_250_500_000);
        let quote = service
            .quote_exact_input(&QuoteParams::new(eth(), usdc(), 1.0, 500))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(quote.amount_in, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(quote.amount_out_formatted, "3250.5");
        assert_eq!(quote.amount_out_minimum, Some(U256::from(3_234_247_500u64)));
        assert_eq!(quote.gas_estimate, U256::from(120_000u64));
    }

    #[tokio::test]
    async fn test_quote_exact_output() {
        let (service, _) = service(0);
        let params = QuoteParams::new(eth(), usdc(), 3_250.5, 500).with_slippage_bps(100);
        let quote = service.quote_exact_output(&params).await.unwrap();

        assert_eq!(quote.amount_out, U256::from(3_250_500_000u64));
        assert_eq!(quote.amount_in, U256::from(1_000_000_000_000_000_000u64));
        assert_eq!(quote.amount_in_maximum, Some(U256::from(1_010_000_000_000_000_000u64)));
        assert_eq!(quote.limit_formatted, "1.01");
    }

    #[tokio::test]
    async fn test_invalid_intent_never_reaches_quoter() {
        let (service, calls) = service(1);
        let err = service
            .quote_exact_input(&QuoteParams::new(eth(), eth(), 1.0, 500))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quote(QuoteError::SameToken)));

        let err = service
            .quote_exact_input(&QuoteParams::new(eth(), usdc(), 1.0, 777))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Quote(QuoteError::InvalidFeeTier(777))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_zero_output_is_no_liquidity() {
        let (service, _) = service(0);
        let params = QuoteParams::new(eth(), usdc(), 1.0, 500);
        assert!(matches!(
            service.quote_exact_input(&params).await,
            Err(AppError::Quote(QuoteError::NoLiquidity))
        ));
        assert!(matches!(
            service.build_swap(&params).await,
            Err(AppError::Quote(QuoteError::NoLiquidity))
        ));
        assert!(!service.pool_exists(&params).await);
    }

    #[tokio::test]
    async fn test_pool_exists() {
        let (service, calls) = service(3_250_500_000);
        // pool_exists always quotes one whole token regardless of the typed amount
        assert!(service.pool_exists(&QuoteParams::new(eth(), usdc(), 0.0, 500)).await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let reverting = V4QuoteService::new(RevertingQuoter, QuoteNormalizer::default(), 20);
        assert!(!reverting.pool_exists(&QuoteParams::new(eth(), usdc(), 1.0, 3_000)).await);
    }

    #[tokio::test]
    async fn test_build_swap_applies_slippage() {
        let (service, _) = service(1_000_000);
        let swap = service
            .build_swap(&QuoteParams::new(eth(), usdc(), 0.01, 500))
            .await
            .unwrap();
        assert!(swap.zero_for_one);
        assert_eq!(swap.amount_in, "10000000000000000");
        assert_eq!(swap.amount_out_minimum, U256::from(995_000u64));
    }
}
