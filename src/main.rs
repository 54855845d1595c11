use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use finq::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Search and quote cryptocurrencies
    #[command(subcommand)]
    Crypto(CryptoCommands),
    /// Search and quote mutual fund schemes
    #[command(subcommand)]
    Fund(FundCommands),
    /// Search and quote stocks
    #[command(subcommand)]
    Stock(StockCommands),
}

#[derive(Subcommand)]
enum CryptoCommands {
    /// Search coins by name or symbol
    Search { query: String },
    /// Quote the current USD price for a coin id
    Price { id: String },
}

#[derive(Subcommand)]
enum FundCommands {
    /// Search schemes by name
    Search { query: String },
    /// Look up the NAV for a scheme code
    Nav { code: String },
}

#[derive(Subcommand)]
enum StockCommands {
    /// Search symbols by free text
    Search { query: String },
    /// Quote the last closing price for a symbol
    Price { symbol: String },
}

impl From<Commands> for finq::AppCommand {
    fn from(cmd: Commands) -> finq::AppCommand {
        match cmd {
            Commands::Crypto(CryptoCommands::Search { query }) => {
                finq::AppCommand::CryptoSearch { query }
            }
            Commands::Crypto(CryptoCommands::Price { id }) => finq::AppCommand::CryptoPrice { id },
            Commands::Fund(FundCommands::Search { query }) => finq::AppCommand::FundSearch { query },
            Commands::Fund(FundCommands::Nav { code }) => finq::AppCommand::FundNav { code },
            Commands::Stock(StockCommands::Search { query }) => {
                finq::AppCommand::StockSearch { query }
            }
            Commands::Stock(StockCommands::Price { symbol }) => {
                finq::AppCommand::StockPrice { symbol }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => finq::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = finq::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
providers:
  coingecko:
    base_url: "https://api.coingecko.com"
  amfi:
    base_url: "https://www.amfiindia.com"
  finnhub:
    base_url: "https://finnhub.io"
    # api_key: "..."  # or set FINNHUB_API_KEY in the environment
  yahoo:
    base_url: "https://query1.finance.yahoo.com"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
