pub mod amfi;
pub mod coingecko;
pub mod finnhub;
pub mod yahoo;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout shared by all data sources.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failures a data source can surface. Callers decide whether to log,
/// surface, or degrade to empty results.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cache I/O failed: {0}")]
    CacheIo(#[from] std::io::Error),
}

/// A source of current prices keyed by identifier.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Latest price for `id`, or `None` when the source does not know it.
    async fn price(&self, id: &str) -> Result<Option<f64>, ProviderError>;
}

pub(crate) fn http_client() -> Result<reqwest::Client, ProviderError> {
    Ok(reqwest::Client::builder()
        .user_agent("finq/0.1")
        .timeout(REQUEST_TIMEOUT)
        .build()?)
}
