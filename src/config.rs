use crate::filter::AccountFilter;
use clap::Parser;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Account filter value that matches every transaction.
pub const WILDCARD: &str = "*";

/// Time format printed next to raw block timestamps.
pub const GMT_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub const DEFAULT_ACCOUNTS_FILE: &str = "workspace/net-info/accounts.json";

type ConfigResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync + 'static>>;

#[derive(Debug, Parser)]
#[command(
    name = "eth_tx_scanner",
    version,
    about = "Scans a block range for transactions and contract creations of an account"
)]
pub struct Cli {
    /// JSON-RPC endpoint of the node (overrides RPC_URL)
    #[arg(long, value_name = "URL")]
    pub rpc_url: Option<String>,

    /// Show transactions sent from or to ACCOUNT ('*' for all)
    #[arg(long, value_name = "ACCOUNT")]
    pub transactions_of: Option<String>,

    /// Show contract-creation transactions of ACCOUNT ('*' for all)
    #[arg(long, value_name = "ACCOUNT")]
    pub contracts_of: Option<String>,

    /// Show the contracts created by every account of the accounts file
    #[arg(long)]
    pub get_contracts: bool,

    /// Accounts file used by --get-contracts (overrides ACCOUNTS_FILE)
    #[arg(long, value_name = "PATH")]
    pub accounts_file: Option<PathBuf>,

    /// First block to scan
    #[arg(long, value_name = "BLOCK")]
    pub start: Option<u64>,

    /// Last block to scan, defaults to the chain head
    #[arg(long, value_name = "BLOCK")]
    pub end: Option<u64>,

    /// Dump bytecode for every matched transaction, not only for creations
    #[arg(long)]
    pub legacy_code_dump: bool,

    /// Also write transaction records as CSV to PATH, contract records to PATH's `.contracts` sibling
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rpc_url: String,
    pub accounts_file: PathBuf,
    pub legacy_code_dump: bool,
}

impl Config {
    /// Reads RPC_URL, ACCOUNTS_FILE and LEGACY_CODE_DUMP, with defaults.
    pub fn from_env() -> ConfigResult<Self> {
        let config = Config {
            rpc_url: env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            accounts_file: env::var("ACCOUNTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ACCOUNTS_FILE)),
            legacy_code_dump: match env::var("LEGACY_CODE_DUMP") {
                Ok(value) => parse_flag(&value)?,
                Err(_) => false,
            },
        };

        if config.rpc_url.trim().is_empty() {
            return Err("RPC_URL must not be empty".into());
        }

        Ok(config)
    }

    /// Command-line values win over the environment.
    pub fn with_cli(mut self, cli: &Cli) -> Self {
        if let Some(rpc_url) = &cli.rpc_url {
            self.rpc_url = rpc_url.clone();
        }
        if let Some(accounts_file) = &cli.accounts_file {
            self.accounts_file = accounts_file.clone();
        }
        self.legacy_code_dump |= cli.legacy_code_dump;
        self
    }
}

fn parse_flag(value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(format!("LEGACY_CODE_DUMP: expected a boolean, got `{}`", other).into()),
    }
}

#[derive(Debug, Deserialize)]
struct AccountEntry {
    account: String,
}

/// Reads the accounts file written when the network was built:
/// `[{"account": "0x...", "pass": "..."}, ...]`. Only addresses are kept.
pub fn load_accounts(path: &Path) -> ConfigResult<Vec<AccountFilter>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read accounts file {}: {}", path.display(), e))?;
    parse_accounts(&raw)
}

pub fn parse_accounts(raw: &str) -> ConfigResult<Vec<AccountFilter>> {
    let entries: Vec<AccountEntry> = serde_json::from_str(raw)?;
    entries
        .iter()
        .map(|entry| entry.account.parse::<AccountFilter>().map_err(Into::into))
        .collect()
}
