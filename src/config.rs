use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

use crate::domain::amount::DisplayPolicy;
use crate::domain::registry::TokenRegistry;
use crate::shared::constants::{
    BASE_CHAIN_ID, CLANKER_BASE_URL, DEFAULT_DEADLINE_MINUTES, DEFAULT_DEBOUNCE_MS,
    DEFAULT_SLIPPAGE_BPS, MAX_DEADLINE_MINUTES, MAX_SLIPPAGE_BPS,
};
use crate::shared::errors::AppError;
use crate::shared::types::Token;
use crate::shared::utils::is_valid_address;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiCfg {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiCfg {
    fn default() -> Self {
        Self {
            base_url: CLANKER_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChainCfg {
    pub chain_id: u64,
}

impl Default for ChainCfg {
    fn default() -> Self {
        Self {
            chain_id: BASE_CHAIN_ID,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwapCfg {
    pub default_fee: u32,
    pub default_slippage_bps: u32,
    /// Upper bound the CLI accepts; the math itself allows up to 10000.
    pub max_slippage_bps: u32,
    pub deadline_minutes: i64,
    pub debounce_ms: u64,
}

impl Default for SwapCfg {
    fn default() -> Self {
        Self {
            default_fee: 500,
            default_slippage_bps: DEFAULT_SLIPPAGE_BPS,
            max_slippage_bps: MAX_SLIPPAGE_BPS,
            deadline_minutes: DEFAULT_DEADLINE_MINUTES,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl SwapCfg {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenCfg {
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiCfg,
    pub chain: ChainCfg,
    pub swap: SwapCfg,
    pub display: DisplayPolicy,
    pub tokens: Vec<TokenCfg>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())
            .with_context(|| format!("read {}", path.as_ref().display()))?;
        let cfg = Self::from_toml(&s).context("parse config")?;
        Ok(cfg)
    }

    pub fn from_toml(s: &str) -> Result<Self, AppError> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.swap.max_slippage_bps > 10_000 {
            return Err(AppError::ConfigError(format!(
                "swap.max_slippage_bps {} is above 10000",
                self.swap.max_slippage_bps
            )));
        }
        if self.swap.default_slippage_bps > self.swap.max_slippage_bps {
            return Err(AppError::ConfigError(format!(
                "swap.default_slippage_bps {} is above max_slippage_bps {}",
                self.swap.default_slippage_bps, self.swap.max_slippage_bps
            )));
        }
        if !(1..=MAX_DEADLINE_MINUTES).contains(&self.swap.deadline_minutes) {
            return Err(AppError::ConfigError(format!(
                "swap.deadline_minutes {} must be between 1 and {}",
                self.swap.deadline_minutes, MAX_DEADLINE_MINUTES
            )));
        }
        for token in &self.tokens {
            if !is_valid_address(&token.address) {
                return Err(AppError::ConfigError(format!(
                    "token {} has an invalid address {}",
                    token.symbol, token.address
                )));
            }
        }
        Ok(())
    }

    /// Built-in Base tokens plus anything listed under `[[tokens]]`.
    pub fn token_registry(&self) -> TokenRegistry {
        let mut registry = TokenRegistry::with_defaults();
        for token in &self.tokens {
            registry.insert(Token::new(
                token.address.clone(),
                token.symbol.clone(),
                token.decimals,
                token.chain_id.unwrap_or(self.chain.chain_id),
            ));
        }
        registry
    }
}
