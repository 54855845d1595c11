use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AmfiProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FinnhubProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub amfi: Option<AmfiProviderConfig>,
    pub finnhub: Option<FinnhubProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            amfi: Some(AmfiProviderConfig {
                base_url: "https://www.amfiindia.com".to_string(),
            }),
            finnhub: Some(FinnhubProviderConfig {
                base_url: "https://finnhub.io".to_string(),
                api_key: None,
            }),
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,

    /// Directory for cached datasets. Defaults to the platform cache dir.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads the config file from the default location. A missing file is
    /// not an error; defaults apply.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_cache_dir() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.cache_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("in", "codito", "finq").context("Could not determine project directories")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Finnhub API key from the config file, falling back to the
    /// `FINNHUB_API_KEY` environment variable.
    pub fn finnhub_api_key(&self) -> Option<String> {
        self.providers
            .finnhub
            .as_ref()
            .and_then(|finnhub| finnhub.api_key.clone())
            .or_else(|| env::var("FINNHUB_API_KEY").ok())
    }
}
