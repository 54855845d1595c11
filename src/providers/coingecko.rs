//! CoinGecko-backed coin catalog and price source.
//!
//! The full coin catalog is downloaded once and served from a local TTL
//! cache; searches are linear scans over the cached catalog.

use crate::cache::CacheStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PriceSource, ProviderError, http_client};

/// Catalog refresh interval.
pub const CATALOG_TTL: Duration = Duration::from_secs(24 * 60 * 60);

const CACHE_KEY: &str = "coingecko_list.json";

/// One entry of the coin catalog, unfiltered from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
}

pub struct CoinGeckoProvider {
    base_url: String,
    cache: Arc<dyn CacheStore>,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, cache: Arc<dyn CacheStore>) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
            cache,
        }
    }

    /// Returns the full coin catalog, from cache when fresh.
    ///
    /// A failed refresh falls back to whatever copy is on disk, stale or
    /// not; with no cached copy at all the catalog is empty. Refresh
    /// failures are logged, never returned.
    pub async fn coin_list(&self) -> Vec<CoinRecord> {
        if self.cache.is_valid(CACHE_KEY)
            && let Some(cached) = self.cache.read(CACHE_KEY)
        {
            match serde_json::from_str(&cached) {
                Ok(catalog) => return catalog,
                Err(e) => warn!("Discarding unreadable coin catalog cache: {e}"),
            }
        }

        match self.download_catalog().await {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Coin catalog refresh failed: {e}");
                self.cache
                    .read(CACHE_KEY)
                    .and_then(|cached| serde_json::from_str(&cached).ok())
                    .unwrap_or_default()
            }
        }
    }

    async fn download_catalog(&self) -> Result<Vec<CoinRecord>, ProviderError> {
        let url = format!("{}/api/v3/coins/list", self.base_url);
        debug!("Requesting coin catalog from {url}");

        let client = http_client()?;
        let body = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let catalog: Vec<CoinRecord> = serde_json::from_str(&body)?;

        if let Err(e) = self.cache.write(CACHE_KEY, &body) {
            warn!("Failed to persist coin catalog cache: {e}");
        }
        Ok(catalog)
    }

    /// Case-insensitive substring search over coin names and symbols.
    /// Matches keep catalog order; no ranking, dedup, or limit.
    pub async fn search(&self, query: &str) -> Vec<CoinRecord> {
        let needle = query.to_lowercase();
        self.coin_list()
            .await
            .into_iter()
            .filter(|coin| {
                coin.name.to_lowercase().contains(&needle)
                    || coin.symbol.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[async_trait]
impl PriceSource for CoinGeckoProvider {
    /// Current USD quote for a coin id, `None` when the response does not
    /// carry one.
    async fn price(&self, id: &str) -> Result<Option<f64>, ProviderError> {
        let url = format!("{}/api/v3/simple/price", self.base_url);
        debug!("Requesting price for {id} from {url}");

        let client = http_client()?;
        let body = client
            .get(&url)
            .query(&[("ids", id), ("vs_currencies", "usd")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let quotes: HashMap<String, HashMap<String, f64>> = serde_json::from_str(&body)?;

        Ok(quotes.get(id).and_then(|quote| quote.get("usd")).copied())
    }
}
