use andromeda_core::{config::AppConfig, QueryEngine};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
use commands::{handle_config_command, CheckSaleOptions, ConfigCommands, DEFAULT_IPFS_GATEWAY};

#[derive(Parser)]
#[command(name = "andromeda-cli")]
#[command(about = "Resolve system addresses, code ids and contract state on Andromeda chains")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (overrides ANDROMEDA_CONFIG)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Configuration Management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Resolve a system contract address through the kernel
    Resolve {
        /// Chain identifier
        #[arg(short, long)]
        chain: String,

        /// System key: adodb, vfs, economics or ibc-registry
        key: String,
    },

    /// Look up the code id of a component version
    CodeId {
        /// Chain identifier
        #[arg(short, long)]
        chain: String,

        /// Component reference, e.g. crowdfund@2.0.3
        component: String,
    },

    /// Send a smart query to a contract
    Query {
        /// Chain identifier
        #[arg(short, long)]
        chain: String,

        /// Contract address
        contract: String,

        /// Builder kind, e.g. crowdfund.campaign_summary (omit to send --params verbatim)
        #[arg(short, long)]
        kind: Option<String>,

        /// JSON parameters (or the raw query when --kind is omitted)
        #[arg(short, long, default_value = "")]
        params: String,
    },

    /// Check that a marketplace sale and its NFT metadata are reachable
    CheckSale {
        /// Chain identifier
        #[arg(short, long)]
        chain: String,

        /// Marketplace contract address
        #[arg(long)]
        marketplace: String,

        /// cw721 contract address
        #[arg(long)]
        nft_contract: String,

        /// Token id
        #[arg(long)]
        token_id: String,

        /// IPFS HTTP gateway
        #[arg(long, default_value = DEFAULT_IPFS_GATEWAY)]
        gateway: String,

        /// Timeout for the metadata fetch in seconds
        #[arg(long, default_value = "15")]
        timeout: u64,
    },
}

/// Initializes the logging system based on the configuration.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| {
        let level = config.logging.level.as_str();
        EnvFilter::new(format!("warn,andromeda_core={level},andromeda_cli={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).init();
    }
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    config.validate().map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Config(config_command) => {
            handle_config_command(config_command)?;
            return Ok(());
        }
        command => command,
    };

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);
    tracing::debug!(chains = config.chains.len(), environment = %config.environment, "configuration loaded");
    let engine = QueryEngine::from_config(&config)?;

    match command {
        Commands::Config(_) => {}

        Commands::Resolve { chain, key } => commands::resolve(&engine, &chain, &key).await?,

        Commands::CodeId { chain, component } => commands::code_id(&engine, &chain, &component).await?,

        Commands::Query { chain, contract, kind, params } => {
            commands::query(&engine, &chain, &contract, kind.as_deref(), &params).await?;
        }

        Commands::CheckSale { chain, marketplace, nft_contract, token_id, gateway, timeout } => {
            let options = CheckSaleOptions {
                chain,
                marketplace,
                nft_contract,
                token_id,
                gateway,
                timeout_secs: timeout,
            };
            commands::check_sale(&engine, &options).await?;
        }
    }

    Ok(())
}
