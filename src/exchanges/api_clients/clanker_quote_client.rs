use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::QuoteApiClient;
use crate::domain::quote::QuoteRequest;
use crate::shared::errors::AppError;
use crate::shared::utils::short_address;

/// Clanker quote API client
pub struct ClankerQuoteClient {
    http_client: Client,
    base_url: String,
}

impl ClankerQuoteClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http_client))
    }

    pub fn with_client(base_url: impl Into<String>, http_client: Client) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn quote_url(&self) -> String {
        format!("{}/api/quote", self.base_url)
    }
}

#[async_trait]
impl QuoteApiClient for ClankerQuoteClient {
    async fn get_quote(&self, request: &QuoteRequest) -> Result<serde_json::Value, AppError> {
        let url = self.quote_url();
        info!(
            "Fetching quote: {} {} -> {}",
            request.sell_amount_raw,
            short_address(&request.sell_token.address),
            short_address(&request.buy_token.address)
        );

        let response = self
            .http_client
            .get(&url)
            .query(&request.to_query_pairs())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Quote API returned {}: {}", status, body);
            return Err(AppError::ApiError(format!(
                "quote API error: {} {}",
                status, body
            )));
        }

        let body: serde_json::Value = response.json().await?;
        debug!("Quote response: {}", body);
        Ok(body)
    }

    async fn is_available(&self) -> bool {
        match self.http_client.get(&self.base_url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Quote API unreachable: {}", e);
                false
            }
        }
    }
}
