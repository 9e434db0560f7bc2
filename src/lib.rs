//! # Modules Overview
//!
//! This crate scans a range of blocks of an Ethereum-style ledger and reports the
//! transactions and contract creations that involve a given account. The scanning
//! engine only produces records; printing and exporting them is left to `display`
//! and `csv`.

/// `classifier`
///
/// Splits matched transactions into plain transactions and contract creations.
/// For a creation, resolves the deployed contract address from the receipt and
/// fetches the code currently stored there.
pub mod classifier;

/// `config`
///
/// Constants, command-line arguments (`Cli`) and environment configuration
/// (`Config`), plus the loader for the accounts file used by the contract sweep.
pub mod config;

/// `csv`
///
/// Exports transaction and contract records to CSV files through the flat row
/// structures `TransactionCsv` and `ContractCsv`.
///
/// Example usage:
/// ```rust,ignore
/// csv::export_transactions_csv(&records, "transactions.csv")?;
/// ```
pub mod csv;

/// `display`
///
/// `Display` implementations that render scan events in the console format of
/// the network helper scripts (`Tx hash: ...`, `Contract:...`, `Total Transactions: N`).
pub mod display;

pub mod error;

/// `filter`
///
/// `AccountFilter`: either the `*` wildcard or a concrete address matched
/// against sender and recipient.
pub mod filter;

/// `models`
///
/// Defines the data exchanged with callers:
/// * `ScanRequest` and `BlockRange` – what to scan.
/// * `TransactionRecord`, `ContractRecord`, `CodeRecord` – what was found.
/// * `ScanEvent` and `ScanSummary` – the ordered output of a scan.
pub mod models;

/// `scanner`
///
/// The range scanner. Walks blocks in ascending order through a `LedgerSource`,
/// applies the account filter, classifies transactions and yields `ScanEvent`s
/// as a stream that ends with `ScanEvent::Finished` or with the error that
/// aborted the scan.
///
/// Example usage:
/// ```rust,ignore
/// let scanner = Scanner::new(ProviderSource::new(provider));
/// let mut events = scanner.transactions_by_account(ScanRequest::new(AccountFilter::Wildcard));
/// while let Some(event) = events.try_next().await? {
///     println!("{}", event);
/// }
/// ```
pub mod scanner;

/// `source`
///
/// `LedgerSource`, the narrow query interface the scanner depends on, and
/// `ProviderSource`, its implementation for any `ethers` `Middleware`.
pub mod source;

pub use error::ScanError;
pub use filter::AccountFilter;
pub use models::{ScanEvent, ScanRequest};
pub use scanner::Scanner;
pub use source::{LedgerSource, ProviderSource};
