//! Chain and venue constants for Uniswap V4 on Base

pub const BASE_CHAIN_ID: u64 = 8453;

/// Native ETH is represented by the zero address in a V4 pool key.
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub const WETH_ADDRESS: &str = "0x4200000000000000000000000000000000000006";
pub const USDC_ADDRESS: &str = "0x833589fCD6eDb6E08f4c7c32D4f71b54Bda02913";

pub const BPS_DENOMINATOR: u32 = 10_000;
pub const DEFAULT_SLIPPAGE_BPS: u32 = 50;
pub const MAX_SLIPPAGE_BPS: u32 = 5_000;
pub const DEFAULT_DEADLINE_MINUTES: i64 = 20;
/// One week.
pub const MAX_DEADLINE_MINUTES: i64 = 10_080;
pub const DEFAULT_DEBOUNCE_MS: u64 = 400;

pub const CLANKER_BASE_URL: &str = "https://clanker.world";
