pub mod clanker_quote_client;

use async_trait::async_trait;

use crate::domain::quote::QuoteRequest;
use crate::shared::errors::AppError;

pub use clanker_quote_client::ClankerQuoteClient;

/// Base trait for HTTP quote providers
///
/// Implementations return the response body untouched; shape checking and
/// normalization happen in the quote domain.
#[async_trait]
pub trait QuoteApiClient: Send + Sync {
    /// Fetch a quote for a swap
    async fn get_quote(&self, request: &QuoteRequest) -> Result<serde_json::Value, AppError>;

    /// Check whether the API is reachable
    async fn is_available(&self) -> bool;
}
