pub mod check_sale;
pub mod config;
pub mod query;
pub mod utils;

pub use check_sale::{check_sale, CheckSaleOptions, DEFAULT_IPFS_GATEWAY};
pub use config::{handle_config_command, ConfigCommands};
pub use query::{code_id, query, resolve};
