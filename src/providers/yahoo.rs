//! Yahoo Finance daily history, used for last-close stock quotes.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{PriceSource, ProviderError, http_client};

pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    #[serde(default)]
    result: Option<Vec<ChartItem>>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[async_trait]
impl PriceSource for YahooFinanceProvider {
    /// Closing value of the most recent daily bar for the symbol, `None`
    /// when there is no trading history.
    async fn price(&self, symbol: &str) -> Result<Option<f64>, ProviderError> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.base_url, symbol
        );
        debug!("Requesting price history from {url}");

        let client = http_client()?;
        let body = client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let data: YahooChartResponse = serde_json::from_str(&body)?;

        let last_close = data
            .chart
            .result
            .unwrap_or_default()
            .first()
            .and_then(|item| item.indicators.as_ref())
            .and_then(|indicators| indicators.quote.first())
            .and_then(|quote| quote.close.as_ref())
            .and_then(|closes| closes.iter().rev().find_map(|close| *close));

        Ok(last_close)
    }
}
