pub mod cache;
pub mod config;
pub mod log;
pub mod providers;
pub mod ui;

use anyhow::{Result, anyhow};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use cache::FileStore;
use providers::PriceSource;
use providers::amfi::{self, AmfiProvider, FundRecord};
use providers::coingecko::{self, CoinGeckoProvider, CoinRecord};
use providers::finnhub::{FinnhubProvider, SymbolMatch};
use providers::yahoo::YahooFinanceProvider;

pub enum AppCommand {
    CryptoSearch { query: String },
    CryptoPrice { id: String },
    FundSearch { query: String },
    FundNav { code: String },
    StockSearch { query: String },
    StockPrice { symbol: String },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let cache_dir = match &config.cache_dir {
        Some(dir) => dir.clone(),
        None => config::AppConfig::default_cache_dir()?,
    };

    match command {
        AppCommand::CryptoSearch { query } => {
            let provider = coingecko_provider(&config, &cache_dir);
            let results = provider.search(&query).await;
            render_coin_matches(&query, &results);
        }
        AppCommand::CryptoPrice { id } => {
            let provider = coingecko_provider(&config, &cache_dir);
            render_quote(&id, Some("USD"), provider.price(&id).await);
        }
        AppCommand::FundSearch { query } => {
            let provider = amfi_provider(&config, &cache_dir);
            let results = provider.search(&query).await;
            render_fund_matches(&query, &results);
        }
        AppCommand::FundNav { code } => {
            let provider = amfi_provider(&config, &cache_dir);
            match provider.nav(&code).await {
                Some(nav) => println!("{code}: {}", ui::price_text(&nav)),
                None => println!("{}", ui::subtle(&format!("No NAV found for scheme {code}"))),
            }
        }
        AppCommand::StockSearch { query } => {
            let api_key = config.finnhub_api_key().ok_or_else(|| {
                anyhow!("No Finnhub API key; set FINNHUB_API_KEY or providers.finnhub.api_key")
            })?;
            let base_url = config
                .providers
                .finnhub
                .as_ref()
                .map_or("https://finnhub.io", |p| &p.base_url);
            let provider = FinnhubProvider::new(base_url, &api_key);
            match provider.search(&query).await {
                Ok(matches) => render_symbol_matches(&query, &matches),
                Err(e) => {
                    warn!("Symbol search failed: {e}");
                    println!("{}", ui::subtle(&format!("No symbols match '{query}'")));
                }
            }
        }
        AppCommand::StockPrice { symbol } => {
            let base_url = config
                .providers
                .yahoo
                .as_ref()
                .map_or("https://query1.finance.yahoo.com", |p| &p.base_url);
            let provider = YahooFinanceProvider::new(base_url);
            render_quote(&symbol, None, provider.price(&symbol).await);
        }
    }

    Ok(())
}

fn coingecko_provider(config: &config::AppConfig, cache_dir: &Path) -> CoinGeckoProvider {
    let base_url = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |p| &p.base_url);
    let store = Arc::new(FileStore::new(cache_dir, coingecko::CATALOG_TTL));
    CoinGeckoProvider::new(base_url, store)
}

fn amfi_provider(config: &config::AppConfig, cache_dir: &Path) -> AmfiProvider {
    let base_url = config
        .providers
        .amfi
        .as_ref()
        .map_or("https://www.amfiindia.com", |p| &p.base_url);
    let store = Arc::new(FileStore::new(cache_dir, amfi::FEED_TTL));
    AmfiProvider::new(base_url, store)
}

fn render_quote(
    id: &str,
    denomination: Option<&str>,
    result: Result<Option<f64>, providers::ProviderError>,
) {
    match result {
        Ok(Some(price)) => {
            let amount = match denomination {
                Some(unit) => format!("{price} {unit}"),
                None => price.to_string(),
            };
            println!("{id}: {}", ui::price_text(&amount));
        }
        Ok(None) => println!("{}", ui::subtle(&format!("No price found for '{id}'"))),
        Err(e) => {
            warn!("Price lookup for {id} failed: {e}");
            println!("{}", ui::subtle(&format!("Price for '{id}' is unavailable")));
        }
    }
}

fn render_coin_matches(query: &str, coins: &[CoinRecord]) {
    if coins.is_empty() {
        println!("{}", ui::subtle(&format!("No coins match '{query}'")));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Id"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
    ]);
    for coin in coins {
        table.add_row(vec![
            coin.id.as_str(),
            coin.symbol.as_str(),
            coin.name.as_str(),
        ]);
    }
    println!("{table}");
}

fn render_fund_matches(query: &str, funds: &[FundRecord]) {
    if funds.is_empty() {
        println!("{}", ui::subtle(&format!("No schemes match '{query}'")));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Scheme Name"),
        ui::header_cell("NAV"),
    ]);
    for fund in funds {
        table.add_row(vec![
            comfy_table::Cell::new(&fund.code),
            comfy_table::Cell::new(&fund.name),
            ui::value_cell(&fund.nav),
        ]);
    }
    println!("{table}");
}

fn render_symbol_matches(query: &str, matches: &[SymbolMatch]) {
    if matches.is_empty() {
        println!("{}", ui::subtle(&format!("No symbols match '{query}'")));
        return;
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Description"),
        ui::header_cell("Type"),
    ]);
    for item in matches {
        table.add_row(vec![
            item.display_symbol.as_str(),
            item.description.as_str(),
            item.kind.as_str(),
        ]);
    }
    println!("{table}");
}
