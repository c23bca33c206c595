//! Quote domain - request/response shapes and normalization

mod normalizer;
mod types;

pub use normalizer::QuoteNormalizer;
pub use types::{
    OnchainQuote, QuoteDisplay, QuoteRequest, QuoteResult, RawQuote, SwapQuote, SwapType,
};
