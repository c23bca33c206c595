//! Error handling for the application

use thiserror::Error;

/// Errors raised by the quote and swap-parameter core.
///
/// Every core function fails with exactly one of these and never partially
/// applies a transformation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("No liquidity available for this swap")]
    NoLiquidity,

    /// The upstream payload failed the shape check. `raw` is the untouched
    /// response so callers can still show it.
    #[error("Malformed quote: {reason}")]
    MalformedQuote {
        reason: String,
        raw: serde_json::Value,
    },

    #[error("Invalid fee tier: {0}")]
    InvalidFeeTier(u32),

    #[error("Slippage must be between 0 and 10000 bps, got {0}")]
    InvalidSlippage(u32),

    #[error("Input and output tokens cannot be the same")]
    SameToken,

    #[error("Invalid token address: {0}")]
    InvalidAddress(String),

    #[error("Fee bps must be between 0 and 10000, got {0}")]
    InvalidFeeBps(u32),

    #[error("Deadline must be between 1 and 10080 minutes ahead, got {0}")]
    InvalidDeadline(i64),
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Quoter call failed: {0}")]
    QuoterError(String),

    #[error("Token not found in registry: {0}")]
    TokenNotFound(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error(transparent)]
    Quote(#[from] QuoteError),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ApiError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::ConfigError(err.to_string())
    }
}
