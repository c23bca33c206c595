//! CLI commands and handlers
use clap::{Parser, Subcommand};
use crate::config::Config;
use crate::domain::amount::{parse_raw_amount, to_raw};
use crate::domain::quote::{QuoteNormalizer, QuoteRequest, QuoteResult};
use crate::domain::registry::TokenRegistry;
use crate::domain::swap::{
    create_exact_output_params, create_swap_params, validate_swap_intent, QuoteParams,
};
use crate::exchanges::api_clients::{ClankerQuoteClient, QuoteApiClient};
use crate::application::quote_session::QuoteSession;
use crate::report::{BuiltSwap, ParamsReport, QuoteReport};
use crate::shared::errors::{AppError, QuoteError};
use crate::shared::types::Token;
use crate::shared::utils::parse_address;
use alloy_primitives::Bytes;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "swapdesk")]
#[command(version, about = "Quote normalization and Uniswap V4 swap parameters for Base")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize a saved quote API response
    Normalize {
        /// JSON file holding the response body
        #[arg(long)]
        file: PathBuf,

        /// Sell token symbol or address
        #[arg(long)]
        sell: String,

        /// Buy token symbol or address
        #[arg(long)]
        buy: String,
    },

    /// Fetch and normalize a quote from the launch API
    Quote {
        #[arg(long)]
        sell: String,

        #[arg(long)]
        buy: String,

        /// Human amount of the sell token
        #[arg(long)]
        amount: f64,

        #[arg(long)]
        taker: String,

        #[arg(long)]
        fee_recipient: Option<String>,

        #[arg(long, default_value_t = 0)]
        fee_bps: u32,

        #[arg(long)]
        fee_token: Option<String>,

        #[arg(long)]
        surplus_recipient: Option<String>,

        /// Overrides [api] base_url
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Read sell amounts from stdin, one per line, and quote the latest
    /// once typing pauses
    Watch {
        #[arg(long)]
        sell: String,

        #[arg(long)]
        buy: String,

        #[arg(long)]
        taker: String,

        /// Overrides [api] base_url
        #[arg(long)]
        base_url: Option<String>,

        /// Overrides [swap] debounce_ms
        #[arg(long)]
        debounce_ms: Option<u64>,
    },

    /// Build single-pool swap parameters
    Params {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        token_out: String,

        /// Human amount of token_in, or of token_out with --exact-output
        #[arg(long)]
        amount: f64,

        /// Fee tier in hundredths of a bip (100, 500, 3000, 10000)
        #[arg(long)]
        fee: Option<u32>,

        #[arg(long)]
        slippage_bps: Option<u32>,

        /// Hook contract of the pool
        #[arg(long)]
        hooks: Option<String>,

        /// Quoted raw output, sets amountOutMinimum
        #[arg(long)]
        quoted_out: Option<String>,

        #[arg(long)]
        exact_output: bool,

        /// Quoted raw input for --exact-output, sets amountInMaximum
        #[arg(long)]
        quoted_in: Option<String>,
    },

    /// Check a swap intent without building anything
    Validate {
        #[arg(long)]
        token_in: String,

        #[arg(long)]
        token_out: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        fee: Option<u32>,

        #[arg(long)]
        slippage_bps: Option<u32>,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: &Config) -> Result<(), AppError> {
        let registry = config.token_registry();
        match command {
            Commands::Normalize { file, sell, buy } => {
                Self::execute_normalize_command(file, &sell, &buy, &registry, config)
            }
            Commands::Quote {
                sell,
                buy,
                amount,
                taker,
                fee_recipient,
                fee_bps,
                fee_token,
                surplus_recipient,
                base_url,
            } => {
                let sell = resolve_token(&registry, &sell)?;
                let buy = resolve_token(&registry, &buy)?;
                let sell_amount_raw = to_raw(amount, sell.decimals)?;
                let mut request = QuoteRequest::new(sell, buy, sell_amount_raw, taker)?;
                if let Some(recipient) = fee_recipient {
                    request = request.with_fee(recipient, fee_bps, fee_token)?;
                }
                if let Some(recipient) = surplus_recipient {
                    request = request.with_surplus_recipient(recipient)?;
                }
                let base_url = base_url.unwrap_or_else(|| config.api.base_url.clone());
                Self::execute_quote_command(request, &base_url, config).await
            }
            Commands::Watch {
                sell,
                buy,
                taker,
                base_url,
                debounce_ms,
            } => {
                let sell = resolve_token(&registry, &sell)?;
                let buy = resolve_token(&registry, &buy)?;
                let base_url = base_url.unwrap_or_else(|| config.api.base_url.clone());
                let quiet = debounce_ms
                    .map(Duration::from_millis)
                    .unwrap_or_else(|| config.swap.debounce());
                Self::execute_watch_command(sell, buy, taker, &base_url, quiet, config).await
            }
            Commands::Params {
                token_in,
                token_out,
                amount,
                fee,
                slippage_bps,
                hooks,
                quoted_out,
                exact_output,
                quoted_in,
            } => {
                let slippage_bps = Self::slippage_bps(slippage_bps, config)?;
                let mut params = QuoteParams::new(
                    resolve_token(&registry, &token_in)?,
                    resolve_token(&registry, &token_out)?,
                    amount,
                    fee.unwrap_or(config.swap.default_fee),
                )
                .with_slippage_bps(slippage_bps);
                if let Some(hooks) = hooks {
                    params = params.with_hooks(parse_address(&hooks)?, Bytes::new());
                }

                if exact_output {
                    Self::execute_exact_output_params(&params, quoted_in, config)
                } else {
                    Self::execute_exact_input_params(&params, quoted_out, config)
                }
            }
            Commands::Validate {
                token_in,
                token_out,
                amount,
                fee,
                slippage_bps,
            } => {
                let token_in = resolve_token(&registry, &token_in)?;
                let token_out = resolve_token(&registry, &token_out)?;
                let error = validate_swap_intent(
                    &token_in,
                    &token_out,
                    amount,
                    fee.unwrap_or(config.swap.default_fee),
                    slippage_bps.unwrap_or(config.swap.default_slippage_bps),
                );
                let verdict = serde_json::json!({
                    "valid": error.is_none(),
                    "error": error.map(|e| e.to_string()),
                });
                println!("{}", serde_json::to_string_pretty(&verdict)?);
                Ok(())
            }
        }
    }

    fn execute_normalize_command(
        file: PathBuf,
        sell: &str,
        buy: &str,
        registry: &TokenRegistry,
        config: &Config,
    ) -> Result<(), AppError> {
        info!("Normalizing quote from {}", file.display());
        let sell = resolve_token(registry, sell)?;
        let buy = resolve_token(registry, buy)?;

        let body = std::fs::read_to_string(&file)?;
        let response: serde_json::Value = serde_json::from_str(&body)?;

        let normalizer = QuoteNormalizer::new(config.display.clone());
        let outcome = normalizer.normalize_response(response, &sell, &buy);
        Self::print_quote_report(sell, buy, outcome)
    }

    async fn execute_quote_command(
        request: QuoteRequest,
        base_url: &str,
        config: &Config,
    ) -> Result<(), AppError> {
        let client = ClankerQuoteClient::new(base_url, Duration::from_secs(config.api.timeout_secs))?;
        let session = QuoteSession::new(Arc::new(client), QuoteNormalizer::new(config.display.clone()));

        let outcome = match session.request(&request).await {
            Ok(Some(result)) => Ok(result),
            Ok(None) => {
                warn!("Quote was superseded before it arrived");
                return Ok(());
            }
            Err(AppError::Quote(e)) => Err(e),
            Err(e) => return Err(e),
        };
        Self::print_quote_report(request.sell_token, request.buy_token, outcome)
    }

    async fn execute_watch_command(
        sell: Token,
        buy: Token,
        taker: String,
        base_url: &str,
        quiet: Duration,
        config: &Config,
    ) -> Result<(), AppError> {
        let client = ClankerQuoteClient::new(base_url, Duration::from_secs(config.api.timeout_secs))?;
        if !client.is_available().await {
            warn!("Quote API at {} is not reachable, quotes will fail until it is", base_url);
        }
        let session = QuoteSession::new(Arc::new(client), QuoteNormalizer::new(config.display.clone()));

        let (intent_tx, intent_rx) = mpsc::channel(32);
        let (result_tx, mut result_rx) = mpsc::channel(8);

        let (reader_sell, reader_buy) = (sell.clone(), buy.clone());
        let reader = tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_intent(line, &reader_sell, &reader_buy, &taker) {
                    Ok(request) => {
                        if intent_tx.send(request).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Ignoring {:?}: {}", line, e),
                }
            }
        });

        info!("Watching stdin for {} -> {} amounts", sell.symbol, buy.symbol);
        let printer = async {
            while let Some(outcome) = result_rx.recv().await {
                let outcome = match outcome {
                    Ok(result) => Ok(result),
                    Err(AppError::Quote(e)) => Err(e),
                    Err(e) => {
                        warn!("{}", e);
                        continue;
                    }
                };
                if let Err(e) = Self::print_quote_report(sell.clone(), buy.clone(), outcome) {
                    warn!("{}", e);
                }
            }
        };
        tokio::join!(session.run(intent_rx, result_tx, quiet), printer);

        reader.abort();
        Ok(())
    }

    fn execute_exact_input_params(
        params: &QuoteParams,
        quoted_out: Option<String>,
        config: &Config,
    ) -> Result<(), AppError> {
        let mut swap = create_swap_params(params, Utc::now(), config.swap.deadline_minutes)?;
        if let Some(quoted_out) = quoted_out {
            swap = swap.with_quoted_amount_out(parse_raw_amount(&quoted_out)?, params.effective_slippage_bps())?;
        }
        info!(
            "Exact-input params for {} {} -> {}",
            params.amount, params.token_in.symbol, params.token_out.symbol
        );

        let report = ParamsReport::new(BuiltSwap::ExactInput(swap));
        println!("{}", report.to_json()?);
        Ok(())
    }

    fn execute_exact_output_params(
        params: &QuoteParams,
        quoted_in: Option<String>,
        config: &Config,
    ) -> Result<(), AppError> {
        let mut swap = create_exact_output_params(params, Utc::now(), config.swap.deadline_minutes)?;
        if let Some(quoted_in) = quoted_in {
            swap = swap.with_quoted_amount_in(parse_raw_amount(&quoted_in)?, params.effective_slippage_bps())?;
        }
        info!(
            "Exact-output params for {} {} <- {}",
            params.amount, params.token_out.symbol, params.token_in.symbol
        );

        let report = ParamsReport::new(BuiltSwap::ExactOutput(swap));
        println!("{}", report.to_json()?);
        Ok(())
    }

    fn print_quote_report(
        sell: Token,
        buy: Token,
        outcome: Result<QuoteResult, QuoteError>,
    ) -> Result<(), AppError> {
        let report = QuoteReport::from_outcome(sell, buy, outcome)?;
        if let Some(warning) = &report.warning {
            warn!("{}", warning);
        }
        println!("{}", report.to_json()?);
        Ok(())
    }

    /// Flag value or the configured default, capped by `swap.max_slippage_bps`.
    fn slippage_bps(flag: Option<u32>, config: &Config) -> Result<u32, AppError> {
        let slippage_bps = flag.unwrap_or(config.swap.default_slippage_bps);
        if slippage_bps > config.swap.max_slippage_bps {
            return Err(QuoteError::InvalidSlippage(slippage_bps).into());
        }
        Ok(slippage_bps)
    }
}

fn parse_intent(amount: &str, sell: &Token, buy: &Token, taker: &str) -> Result<QuoteRequest, QuoteError> {
    let amount: f64 = amount
        .parse()
        .map_err(|_| QuoteError::InvalidAmount(amount.to_string()))?;
    QuoteRequest::new(sell.clone(), buy.clone(), to_raw(amount, sell.decimals)?, taker)
}

fn resolve_token(registry: &TokenRegistry, symbol_or_address: &str) -> Result<Token, AppError> {
    registry
        .resolve(symbol_or_address)
        .cloned()
        .ok_or_else(|| AppError::TokenNotFound(symbol_or_address.to_string()))
}
