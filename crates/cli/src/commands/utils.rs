use andromeda_core::QueryError;
use std::fmt;

#[derive(Debug)]
pub enum CliError {
    Config(String),
    Io(String),
    Network(String),
    Query(QueryError),
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Network(msg) => write!(f, "Network error: {msg}"),
            Self::Query(err) => write!(f, "Query failed ({}): {err}", err.kind().as_str()),
            Self::General(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<reqwest::Error> for CliError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::General(error.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(error: QueryError) -> Self {
        Self::Query(error)
    }
}

pub type CliResult<T> = Result<T, CliError>;

pub fn print_step(message: &str) {
    println!("\n==> {message}");
}

pub fn print_success(message: &str) {
    println!("[SUCCESS] {message}");
}

pub fn print_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn print_info(message: &str) {
    println!("[INFO] {message}");
}

pub fn print_json(value: &serde_json::Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
