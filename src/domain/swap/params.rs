use alloy_primitives::{Address, Bytes, U256};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{build_pool_key, validate_swap_intent, zero_for_one, PoolKey};
use crate::domain::amount::{parse_raw_amount, to_raw};
use crate::math::{maximum_amount_in, minimum_amount_out};
use crate::shared::constants::{DEFAULT_DEADLINE_MINUTES, DEFAULT_SLIPPAGE_BPS, MAX_DEADLINE_MINUTES};
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;
use crate::shared::utils::{serialize_opt_u256, serialize_u256};

/// A user's swap intent as typed into the UI.
#[derive(Debug, Clone)]
pub struct QuoteParams {
    pub token_in: Token,
    pub token_out: Token,
    /// Human amount of `token_in` (exact-input) or `token_out` (exact-output).
    pub amount: f64,
    pub fee: u32,
    pub slippage_bps: Option<u32>,
    pub hooks: Option<Address>,
    pub hook_data: Bytes,
}

impl QuoteParams {
    pub fn new(token_in: Token, token_out: Token, amount: f64, fee: u32) -> Self {
        Self {
            token_in,
            token_out,
            amount,
            fee,
            slippage_bps: None,
            hooks: None,
            hook_data: Bytes::new(),
        }
    }

    pub fn with_slippage_bps(mut self, slippage_bps: u32) -> Self {
        self.slippage_bps = Some(slippage_bps);
        self
    }

    pub fn with_hooks(mut self, hooks: Address, hook_data: Bytes) -> Self {
        self.hooks = Some(hooks);
        self.hook_data = hook_data;
        self
    }

    pub fn effective_slippage_bps(&self) -> u32 {
        self.slippage_bps.unwrap_or(DEFAULT_SLIPPAGE_BPS)
    }

    pub fn validate(&self) -> Result<(), QuoteError> {
        match validate_swap_intent(
            &self.token_in,
            &self.token_out,
            self.amount,
            self.fee,
            self.effective_slippage_bps(),
        ) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Venue-addressable parameters for a single-pool exact-input swap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub pool_key: PoolKey,
    pub zero_for_one: bool,
    /// Raw amount of `token_in`, base-10.
    pub amount_in: String,
    /// Zero until a quote has been applied.
    #[serde(serialize_with = "serialize_u256")]
    pub amount_out_minimum: U256,
    pub hook_data: Bytes,
    /// Unix seconds.
    pub deadline: u64,
}

impl SwapParams {
    pub fn with_quoted_amount_out(
        mut self,
        quoted_amount_out: U256,
        slippage_bps: u32,
    ) -> Result<Self, QuoteError> {
        self.amount_out_minimum = minimum_amount_out(quoted_amount_out, slippage_bps)?;
        Ok(self)
    }

    pub fn exact_amount(&self) -> Result<U256, QuoteError> {
        parse_raw_amount(&self.amount_in)
    }
}

/// Exact-output counterpart of [`SwapParams`]: the output is fixed and the
/// input is capped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactOutputParams {
    pub pool_key: PoolKey,
    pub zero_for_one: bool,
    /// Raw amount of `token_out`, base-10.
    pub amount_out: String,
    /// `None` until a quote has been applied.
    #[serde(serialize_with = "serialize_opt_u256")]
    pub amount_in_maximum: Option<U256>,
    pub hook_data: Bytes,
    /// Unix seconds.
    pub deadline: u64,
}

impl ExactOutputParams {
    pub fn with_quoted_amount_in(
        mut self,
        quoted_amount_in: U256,
        slippage_bps: u32,
    ) -> Result<Self, QuoteError> {
        self.amount_in_maximum = Some(maximum_amount_in(quoted_amount_in, slippage_bps)?);
        Ok(self)
    }

    pub fn exact_amount(&self) -> Result<U256, QuoteError> {
        parse_raw_amount(&self.amount_out)
    }
}

/// Turn an intent into swap parameters for an exact-input swap.
pub fn create_swap_params(
    params: &QuoteParams,
    now: DateTime<Utc>,
    deadline_minutes: i64,
) -> Result<SwapParams, QuoteError> {
    let common = build_common(params, params.token_in.decimals, now, deadline_minutes)?;
    Ok(SwapParams {
        pool_key: common.pool_key,
        zero_for_one: common.zero_for_one,
        amount_in: common.exact_amount,
        amount_out_minimum: U256::ZERO,
        hook_data: params.hook_data.clone(),
        deadline: common.deadline,
    })
}

/// Exact-output parameters; `params.amount` is the desired output.
pub fn create_exact_output_params(
    params: &QuoteParams,
    now: DateTime<Utc>,
    deadline_minutes: i64,
) -> Result<ExactOutputParams, QuoteError> {
    let common = build_common(params, params.token_out.decimals, now, deadline_minutes)?;
    Ok(ExactOutputParams {
        pool_key: common.pool_key,
        zero_for_one: common.zero_for_one,
        amount_out: common.exact_amount,
        amount_in_maximum: None,
        hook_data: params.hook_data.clone(),
        deadline: common.deadline,
    })
}

struct CommonParams {
    pool_key: PoolKey,
    zero_for_one: bool,
    exact_amount: String,
    deadline: u64,
}

fn build_common(
    params: &QuoteParams,
    amount_decimals: u8,
    now: DateTime<Utc>,
    deadline_minutes: i64,
) -> Result<CommonParams, QuoteError> {
    params.validate()?;

    let pool_key = build_pool_key(&params.token_in, &params.token_out, params.fee, params.hooks)?;
    let exact_amount = to_raw(params.amount, amount_decimals)?;
    if exact_amount == "0" {
        return Err(QuoteError::InvalidAmount(format!(
            "{} is below one raw unit at {} decimals",
            params.amount, amount_decimals
        )));
    }

    Ok(CommonParams {
        zero_for_one: zero_for_one(&params.token_in, &pool_key),
        pool_key,
        exact_amount,
        deadline: create_deadline(now, deadline_minutes)?,
    })
}

/// Unix timestamp `minutes` after `now`. Only 1 to 10080 minutes ahead is
/// accepted.
pub fn create_deadline(now: DateTime<Utc>, minutes: i64) -> Result<u64, QuoteError> {
    if !(1..=MAX_DEADLINE_MINUTES).contains(&minutes) {
        return Err(QuoteError::InvalidDeadline(minutes));
    }
    let deadline = Duration::try_minutes(minutes)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or(QuoteError::InvalidDeadline(minutes))?;
    u64::try_from(deadline.timestamp()).map_err(|_| QuoteError::InvalidDeadline(minutes))
}

pub fn default_deadline(now: DateTime<Utc>) -> Result<u64, QuoteError> {
    create_deadline(now, DEFAULT_DEADLINE_MINUTES)
}
