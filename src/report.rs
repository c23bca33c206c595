// src/report.rs
use alloy_primitives::B256;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::quote::{QuoteResult, SwapType};
use crate::domain::swap::{ExactOutputParams, PoolKey, SwapParams};
use crate::shared::errors::QuoteError;
use crate::shared::types::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    Ok,
    NoLiquidity,
    Malformed,
}

/// What the CLI prints for a launch-API quote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub sell_token: Token,
    pub buy_token: Token,
    pub status: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<QuoteResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    // untouched upstream payload when it failed the shape check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<serde_json::Value>,
}

impl QuoteReport {
    /// Builds a report from a normalization outcome. Malformed and empty
    /// quotes still produce a report; any other error is passed back.
    pub fn from_outcome(
        sell_token: Token,
        buy_token: Token,
        outcome: Result<QuoteResult, QuoteError>,
    ) -> Result<Self, QuoteError> {
        let (status, quote, warning, raw) = match outcome {
            Ok(quote) => (QuoteStatus::Ok, Some(quote), None, None),
            Err(QuoteError::NoLiquidity) => (
                QuoteStatus::NoLiquidity,
                None,
                Some(QuoteError::NoLiquidity.to_string()),
                None,
            ),
            Err(QuoteError::MalformedQuote { reason, raw }) => (
                QuoteStatus::Malformed,
                None,
                Some(format!("quote response failed validation: {}", reason)),
                Some(raw),
            ),
            Err(e) => return Err(e),
        };

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            sell_token,
            buy_token,
            status,
            quote,
            warning,
            raw,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Either shape of built swap parameters.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BuiltSwap {
    ExactInput(SwapParams),
    ExactOutput(ExactOutputParams),
}

impl BuiltSwap {
    pub fn swap_type(&self) -> SwapType {
        match self {
            BuiltSwap::ExactInput(_) => SwapType::ExactInput,
            BuiltSwap::ExactOutput(_) => SwapType::ExactOutput,
        }
    }

    pub fn pool_key(&self) -> &PoolKey {
        match self {
            BuiltSwap::ExactInput(swap) => &swap.pool_key,
            BuiltSwap::ExactOutput(swap) => &swap.pool_key,
        }
    }
}

/// What the CLI prints for `params`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamsReport {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub swap_type: SwapType,
    pub pool_id: B256,
    pub swap_params: BuiltSwap,
}

impl ParamsReport {
    pub fn new(swap_params: BuiltSwap) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            swap_type: swap_params.swap_type(),
            pool_id: swap_params.pool_key().pool_id(),
            swap_params,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
