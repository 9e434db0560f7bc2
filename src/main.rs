use clap::Parser;
use eth_tx_scanner::config::{self, Cli, Config};
use eth_tx_scanner::csv::CsvExporter;
use eth_tx_scanner::models::{CodeDumpPolicy, ScanRequest};
use eth_tx_scanner::scanner::{ScanStream, Scanner};
use eth_tx_scanner::{AccountFilter, ProviderSource};
use ethers::providers::{Http, Provider};
use futures::TryStreamExt;
use log::{info, warn};
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    env_logger::init();

    let config = Config::from_env()?.with_cli(&cli);
    let provider = Arc::new(Provider::<Http>::try_from(config.rpc_url.as_str())?);
    info!("Using node at {}", config.rpc_url);

    let code_dump = if config.legacy_code_dump {
        CodeDumpPolicy::EveryMatch
    } else {
        CodeDumpPolicy::CreationsOnly
    };
    let scanner = Scanner::new(ProviderSource::new(provider)).with_code_dump(code_dump);

    if !cli.get_contracts && cli.contracts_of.is_none() && cli.transactions_of.is_none() {
        warn!("Nothing to scan: pass --transactions-of, --contracts-of or --get-contracts");
        return Ok(());
    }

    let mut exporter = cli.csv.as_ref().map(CsvExporter::new);

    if cli.get_contracts {
        let accounts = config::load_accounts(&config.accounts_file)?;
        info!(
            "Looking up contracts of {} accounts from {}",
            accounts.len(),
            config.accounts_file.display()
        );
        for account in accounts {
            let request = ScanRequest::between(account, cli.start, cli.end);
            print_events(scanner.contracts(request), exporter.as_mut()).await?;
        }
    }

    if let Some(account) = &cli.contracts_of {
        let request = ScanRequest::between(account.parse::<AccountFilter>()?, cli.start, cli.end);
        print_events(scanner.contract_creations_by_account(request), exporter.as_mut()).await?;
    }

    if let Some(account) = &cli.transactions_of {
        let request = ScanRequest::between(account.parse::<AccountFilter>()?, cli.start, cli.end);
        print_events(scanner.transactions_by_account(request), exporter.as_mut()).await?;
    }

    if let Some(exporter) = exporter {
        for path in exporter.finish()? {
            info!("Wrote records to {}", path.display());
        }
    }

    Ok(())
}

/// Prints each event as it arrives and hands it to the CSV exporter, if any.
async fn print_events(
    mut events: ScanStream<'_>,
    mut exporter: Option<&mut CsvExporter>,
) -> Result<(), BoxError> {
    while let Some(event) = events.try_next().await? {
        let text = event.to_string();
        if !text.is_empty() {
            println!("{}", text);
        }
        if let Some(exporter) = exporter.as_deref_mut() {
            exporter.write_event(&event)?;
        }
    }
    Ok(())
}
