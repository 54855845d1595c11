//! Finnhub symbol search.

use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, http_client};

/// One entry of a symbol search response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolMatch {
    #[serde(default)]
    pub symbol: String,
    #[serde(rename = "displaySymbol", default)]
    pub display_symbol: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SymbolMatch>,
}

pub struct FinnhubProvider {
    base_url: String,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        FinnhubProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Symbol matches for a free-text query, empty when the response
    /// carries no `result` field. Uncached; every call hits the API.
    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, ProviderError> {
        let url = format!("{}/api/v1/search", self.base_url);
        debug!("Requesting symbol search from {url}");

        let client = http_client()?;
        let body = client
            .get(&url)
            .query(&[("q", query), ("token", &self.api_key)])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: SearchResponse = serde_json::from_str(&body)?;

        Ok(response.result)
    }
}
