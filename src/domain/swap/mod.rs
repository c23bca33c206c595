//! Swap domain - pool keys, swap parameters and intent validation

mod fee_tier;
mod params;
mod pool_key;
mod validation;

pub use fee_tier::FeeTier;
pub use params::{
    create_deadline, create_exact_output_params, create_swap_params, default_deadline,
    ExactOutputParams, QuoteParams, SwapParams,
};
pub use pool_key::{build_pool_key, token_order, zero_for_one, PoolKey};
pub use validation::validate_swap_intent;

pub use crate::math::{maximum_amount_in, minimum_amount_out};
