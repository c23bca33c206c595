//! Uniswap V4 single-pool quoting

pub mod quoter;

pub use quoter::{PoolQuoter, V4QuoteService};
