//! Live quoting for an input field that changes while requests are in flight.
//!
//! Intents are debounced, every request gets a ticket, and a response is
//! only surfaced if its ticket is still the latest one issued.

use crate::domain::quote::{QuoteNormalizer, QuoteRequest, QuoteResult};
use crate::exchanges::api_clients::QuoteApiClient;
use crate::shared::errors::AppError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};

/// Hands out increasing tickets; only the newest one is current.
#[derive(Debug, Default)]
pub struct QuoteSequencer {
    latest: AtomicU64,
}

impl QuoteSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }

    pub fn latest(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }
}

/// Waits for an intent, then keeps replacing it with newer ones until the
/// channel stays quiet for `quiet`. `None` once the sender is gone and
/// nothing is pending.
pub async fn debounce<T>(rx: &mut mpsc::Receiver<T>, quiet: Duration) -> Option<T> {
    let first = rx.recv().await?;
    Some(settle(first, rx, quiet).await)
}

/// Like [`debounce`] with `latest` already received.
async fn settle<T>(mut latest: T, rx: &mut mpsc::Receiver<T>, quiet: Duration) -> T {
    loop {
        match tokio::time::timeout(quiet, rx.recv()).await {
            Ok(Some(next)) => latest = next,
            Ok(None) | Err(_) => return latest,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub requests_sent: u64,
    pub stale_dropped: u64,
    pub failures: u64,
}

pub struct QuoteSession {
    client: Arc<dyn QuoteApiClient>,
    normalizer: QuoteNormalizer,
    sequencer: QuoteSequencer,
    stats: Arc<RwLock<SessionStats>>,
}

impl QuoteSession {
    pub fn new(client: Arc<dyn QuoteApiClient>, normalizer: QuoteNormalizer) -> Self {
        Self {
            client,
            normalizer,
            sequencer: QuoteSequencer::new(),
            stats: Arc::new(RwLock::new(SessionStats::default())),
        }
    }

    /// Fetch and normalize one quote. `Ok(None)` means a newer request was
    /// issued while this one was in flight and the result was dropped.
    pub async fn request(&self, request: &QuoteRequest) -> Result<Option<QuoteResult>, AppError> {
        let ticket = self.sequencer.next_ticket();
        self.stats.write().await.requests_sent += 1;

        let response = self.client.get_quote(request).await;

        if !self.sequencer.is_current(ticket) {
            debug!(
                "Dropping quote #{} (latest is #{})",
                ticket,
                self.sequencer.latest()
            );
            self.stats.write().await.stale_dropped += 1;
            return Ok(None);
        }

        let result = response.and_then(|value| {
            self.normalizer
                .normalize_response(value, &request.sell_token, &request.buy_token)
                .map_err(AppError::from)
        });
        if result.is_err() {
            self.stats.write().await.failures += 1;
        }
        result.map(Some)
    }

    /// Debounce intents and forward each surviving result. An intent that
    /// arrives while a request is in flight cancels that request. Returns
    /// when the intent channel closes or the result receiver is dropped.
    pub async fn run(
        &self,
        mut intents: mpsc::Receiver<QuoteRequest>,
        results: mpsc::Sender<Result<QuoteResult, AppError>>,
        quiet: Duration,
    ) {
        info!("Quote session started (debounce {:?})", quiet);

        let mut closed = false;
        let mut next = debounce(&mut intents, quiet).await;
        while let Some(request) = next.take() {
            let in_flight = self.request(&request);
            tokio::pin!(in_flight);

            let outcome = loop {
                tokio::select! {
                    outcome = &mut in_flight => break Some(outcome),
                    newer = intents.recv(), if !closed => match newer {
                        Some(newer) => {
                            next = Some(settle(newer, &mut intents, quiet).await);
                            break None;
                        }
                        None => closed = true,
                    },
                }
            };

            let outcome = match outcome {
                Some(outcome) => outcome,
                None => {
                    debug!("Superseded in-flight quote for {}", request.sell_amount_raw);
                    self.stats.write().await.stale_dropped += 1;
                    continue;
                }
            };

            let outcome = match outcome {
                Ok(Some(result)) => Some(Ok(result)),
                Ok(None) => None,
                Err(e) => {
                    warn!("Quote failed: {}", e);
                    Some(Err(e))
                }
            };
            if let Some(outcome) = outcome {
                if results.send(outcome).await.is_err() {
                    break;
                }
            }

            if !closed {
                next = debounce(&mut intents, quiet).await;
            }
        }

        info!("Quote session stopped: {:?}", self.stats().await);
    }

    pub async fn stats(&self) -> SessionStats {
        self.stats.read().await.clone()
    }
}
