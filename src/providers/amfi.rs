//! AMFI NAV feed: download, cache, and scan the NAVAll text file.
//!
//! The feed is a semicolon-delimited text file mixing scheme records with
//! fund-house headers and section separators. Lookups are linear scans over
//! the cached copy.

use crate::cache::CacheStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{ProviderError, http_client};

/// Feed refresh interval. NAVs publish once per business day.
pub const FEED_TTL: Duration = Duration::from_secs(4 * 60 * 60);

const CACHE_KEY: &str = "amfi_nav.txt";

/// One scheme record from the NAV feed.
#[derive(Debug, Clone, PartialEq)]
pub struct FundRecord {
    pub code: String,
    pub name: String,
    pub nav: String,
}

pub struct AmfiProvider {
    base_url: String,
    cache: Arc<dyn CacheStore>,
}

impl AmfiProvider {
    pub fn new(base_url: &str, cache: Arc<dyn CacheStore>) -> Self {
        AmfiProvider {
            base_url: base_url.to_string(),
            cache,
        }
    }

    /// Refreshes the NAV feed when the cached copy is stale or missing.
    ///
    /// A failed download is logged and leaves any stale copy in place; the
    /// caller proceeds with whatever is on disk.
    pub async fn ensure_data(&self) {
        if self.cache.is_valid(CACHE_KEY) {
            return;
        }
        if let Err(e) = self.download_feed().await {
            warn!("NAV feed refresh failed: {e}");
        }
    }

    async fn download_feed(&self) -> Result<(), ProviderError> {
        let url = format!("{}/spages/NAVAll.txt", self.base_url);
        debug!("Requesting NAV feed from {url}");

        let client = http_client()?;
        let body = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        self.cache.write(CACHE_KEY, &body)?;
        Ok(())
    }

    /// Case-insensitive substring search over scheme names, in feed order.
    pub async fn search(&self, query: &str) -> Vec<FundRecord> {
        self.ensure_data().await;
        let Some(feed) = self.cache.read(CACHE_KEY) else {
            return Vec::new();
        };

        let needle = query.to_lowercase();
        parse_feed(&feed)
            .filter(|fund| fund.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// NAV for an exact scheme code, from the first matching record.
    /// `None` when no record matches or no feed copy exists.
    pub async fn nav(&self, scheme_code: &str) -> Option<String> {
        self.ensure_data().await;
        let feed = self.cache.read(CACHE_KEY)?;

        parse_feed(&feed)
            .find(|fund| fund.code == scheme_code)
            .map(|fund| fund.nav)
    }
}

/// Parses NAVAll lines of the form `code;isin;isin;name;nav;...`.
///
/// Header and separator lines carry fewer than 5 fields or a non-numeric
/// leading field and are skipped. Trailing fields beyond the NAV are
/// ignored.
fn parse_feed(feed: &str) -> impl Iterator<Item = FundRecord> + '_ {
    feed.lines().filter_map(|line| {
        let parts: Vec<&str> = line.trim().split(';').collect();
        if parts.len() < 5 {
            return None;
        }
        let code = parts[0].trim();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(FundRecord {
            code: code.to_string(),
            name: parts[3].trim().to_string(),
            nav: parts[4].trim().to_string(),
        })
    })
}
