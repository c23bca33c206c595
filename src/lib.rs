//! Swapdesk - quote normalization and Uniswap V4 swap parameters for Base

pub mod application;
pub mod config;
pub mod domain;
pub mod exchanges;
pub mod math;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use config::Config;
pub use domain::quote::{QuoteNormalizer, QuoteResult, SwapQuote};
pub use domain::registry::TokenRegistry;
pub use domain::swap::{create_swap_params, validate_swap_intent, PoolKey, QuoteParams, SwapParams};
pub use exchanges::uniswap_v4::V4QuoteService;
pub use shared::errors::{AppError, QuoteError};
pub use shared::types::Token;
