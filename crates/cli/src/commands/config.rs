use andromeda_core::config::AppConfig;
use clap::Subcommand;
use std::path::Path;

use super::utils::{print_error, print_info, print_success, CliError, CliResult};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to config file
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Show the effective configuration
    Show {
        /// Path to config file
        #[arg(short, long, default_value = "config/config.toml")]
        file: String,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output path for the config file
        #[arg(short, long, default_value = "config/config.toml")]
        output: String,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn handle_config_command(command: ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Validate { file } => validate_config(&file),
        ConfigCommands::Show { file } => show_config(&file),
        ConfigCommands::Generate { output, force } => generate_config(&output, force),
    }
}

fn validate_config(file: &str) -> CliResult<()> {
    if !Path::new(file).exists() {
        print_error(&format!("Configuration file not found: {file}"));
        return Err(CliError::Config(format!("File not found: {file}")));
    }

    print_info(&format!("Loading configuration from {file}..."));
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    print_info("Validating configuration...");
    config.validate().map_err(CliError::Config)?;

    print_success("Configuration is valid!");

    println!("Configuration Summary:");
    println!("  Chains: {}", config.chains.len());
    for chain in &config.chains {
        println!(
            "    {} (kernel {}, prefers {})",
            chain.chain_identifier, chain.kernel_address, chain.preferred_transport
        );
    }
    println!("  Cache: ttl {}s, capacity {}", config.cache.ttl_seconds, config.cache.capacity);
    println!("  Request timeout: {}s", config.client.request_timeout_seconds);

    Ok(())
}

fn show_config(file: &str) -> CliResult<()> {
    let config = AppConfig::from_file(file).map_err(|e| CliError::Config(e.to_string()))?;

    println!("Configuration from {file}:");

    println!("\n[Client]");
    println!("  Request Timeout: {}s", config.client.request_timeout_seconds);
    println!("  Connect Timeout: {}s", config.client.connect_timeout_seconds);
    println!("  Concurrent Limit: {}", config.client.concurrent_limit);

    println!("\n[Cache]");
    println!("  TTL: {}s", config.cache.ttl_seconds);
    println!("  Capacity: {}", config.cache.capacity);

    println!("\n[Chains] ({} configured)", config.chains.len());
    for chain in &config.chains {
        println!("  {}:", chain.chain_identifier);
        println!("    Kernel: {}", chain.kernel_address);
        if let Some(rpc) = &chain.rpc_url {
            println!("    RPC: {rpc}");
        }
        if let Some(lcd) = &chain.lcd_url {
            println!("    LCD: {lcd}");
        }
        println!("    Preferred: {}", chain.preferred_transport);
    }

    println!("\n[Logging]");
    println!("  Level: {}", config.logging.level);
    println!("  Format: {}", config.logging.format);

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# Andromeda query configuration

[client]
request_timeout_seconds = 30
connect_timeout_seconds = 5
concurrent_limit = 100

[cache]
ttl_seconds = 300
capacity = 5

[[chains]]
chain_identifier = "galileo-4"
kernel_address = "YOUR_KERNEL_ADDRESS"
rpc_url = "https://rpc.testnet.andromedaprotocol.io"
lcd_url = "https://api.testnet.andromedaprotocol.io"
preferred_transport = "rpc"

[logging]
level = "info"
format = "pretty"
"#;

fn generate_config(output: &str, force: bool) -> CliResult<()> {
    if Path::new(output).exists() && !force {
        return Err(CliError::Config(format!("File {output} already exists. Use --force to overwrite.")));
    }

    if let Some(parent) = Path::new(output).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output, SAMPLE_CONFIG)?;

    print_success(&format!("Sample configuration generated: {output}"));
    print_info("Replace YOUR_KERNEL_ADDRESS with the kernel address of your deployment.");

    Ok(())
}
