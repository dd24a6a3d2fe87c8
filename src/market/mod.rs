//! Market Data: optional live quote enrichment for the analysis prompt
//!
//! The quote endpoint is a pluggable integration: any URL returning JSON is
//! accepted and the whole document is passed to the prompt as-is. A failed
//! fetch never stops the daily run; the prompt asks the model to look up the
//! current price instead.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

/// Raw JSON returned by the market data endpoint.
pub type MarketSnapshot = Value;

/// Market data fetch errors
#[derive(Debug, thiserror::Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Market data fetch disabled")]
    Disabled,
}

/// Source of the optional market snapshot
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn fetch(&self) -> Result<MarketSnapshot, MarketDataError>;

    /// Name for logging
    fn source_name(&self) -> &str;
}

/// Single unauthenticated GET against a configurable URL.
#[derive(Clone)]
pub struct HttpMarketData {
    http: reqwest::Client,
    url: String,
}

impl HttpMarketData {
    pub fn new(http: reqwest::Client, url: &str) -> Self {
        Self {
            http,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl MarketDataSource for HttpMarketData {
    async fn fetch(&self) -> Result<MarketSnapshot, MarketDataError> {
        let resp = self.http.get(&self.url).send().await?;

        match resp.status() {
            reqwest::StatusCode::OK => {
                let body = resp.bytes().await?;
                Ok(serde_json::from_slice(&body)?)
            }
            status => Err(MarketDataError::Status(status)),
        }
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}

/// Used when `MARKET_DATA_URL` is set to an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMarketData;

#[async_trait]
impl MarketDataSource for NoMarketData {
    async fn fetch(&self) -> Result<MarketSnapshot, MarketDataError> {
        Err(MarketDataError::Disabled)
    }

    fn source_name(&self) -> &str {
        "disabled"
    }
}

/// Fetch a snapshot, logging and swallowing any failure.
pub async fn fetch_optional(source: &dyn MarketDataSource) -> Option<MarketSnapshot> {
    match source.fetch().await {
        Ok(snapshot) => {
            info!(source = source.source_name(), "Market data fetched");
            Some(snapshot)
        }
        Err(MarketDataError::Disabled) => None,
        Err(e) => {
            warn!(
                source = source.source_name(),
                error = %e,
                "Error fetching market data, continuing without live data"
            );
            None
        }
    }
}
