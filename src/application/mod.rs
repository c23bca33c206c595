//! Application layer - CLI commands and live quoting

pub mod commands;
pub mod quote_session;

pub use commands::{Cli, Commands, CommandExecutor};
pub use quote_session::{debounce, QuoteSequencer, QuoteSession, SessionStats};
