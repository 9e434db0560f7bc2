use crate::models::{ContractRecord, ScanEvent, TransactionRecord};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct TransactionCsv {
    pub hash: String,
    pub nonce: String,
    pub block_hash: String,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub from: String,
    pub to: String,
    pub value: String,
    pub timestamp: u64,
    pub time: String,
    pub gas_price: String,
    pub gas: String,
    pub input: String,
}

impl From<&TransactionRecord> for TransactionCsv {
    fn from(tx: &TransactionRecord) -> Self {
        TransactionCsv {
            hash: format!("{:?}", tx.hash),
            nonce: tx.nonce.to_string(),
            block_hash: tx.block_hash.map(|h| format!("{:?}", h)).unwrap_or_default(),
            block_number: tx.block_number,
            transaction_index: tx.transaction_index,
            from: format!("{:?}", tx.from),
            to: tx.to.map(|a| format!("{:?}", a)).unwrap_or_default(),
            value: tx.value.to_string(),
            timestamp: tx.timestamp,
            time: tx.time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            gas_price: tx.gas_price.map(|p| p.to_string()).unwrap_or_default(),
            gas: tx.gas.to_string(),
            input: tx.input.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContractCsv {
    pub contract_address: String,
    pub hash: String,
    pub from: String,
    pub block_number: Option<u64>,
    pub timestamp: u64,
    pub time: String,
    pub input: String,
    pub code: String,
}

impl From<&ContractRecord> for ContractCsv {
    fn from(contract: &ContractRecord) -> Self {
        ContractCsv {
            contract_address: format!("{:?}", contract.contract_address),
            hash: format!("{:?}", contract.hash),
            from: format!("{:?}", contract.from),
            block_number: contract.block_number,
            timestamp: contract.timestamp,
            time: contract.time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            input: contract.input.to_string(),
            code: contract.code.to_string(),
        }
    }
}

pub fn export_transactions_csv<P: AsRef<Path>>(
    transactions: &[TransactionRecord],
    path: P,
) -> csv::Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for tx in transactions {
        wtr.serialize(TransactionCsv::from(tx))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_contracts_csv<P: AsRef<Path>>(
    contracts: &[ContractRecord],
    path: P,
) -> csv::Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for contract in contracts {
        wtr.serialize(ContractCsv::from(contract))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Sibling file that receives contract rows when transactions go to `path`:
/// `out.csv` becomes `out.contracts.csv`.
pub fn contracts_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}.contracts.{}", stem, ext.to_string_lossy()),
        None => format!("{}.contracts", stem),
    };
    path.with_file_name(name)
}

/// Writes scan records to CSV as they arrive. Transaction rows go to the
/// configured path, contract rows to [`contracts_path`]. A file is only
/// created once its first row is written.
pub struct CsvExporter {
    transactions_path: PathBuf,
    contracts_path: PathBuf,
    transactions: Option<Writer<File>>,
    contracts: Option<Writer<File>>,
}

impl CsvExporter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        CsvExporter {
            transactions_path: path.to_path_buf(),
            contracts_path: contracts_path(path),
            transactions: None,
            contracts: None,
        }
    }

    /// Records other than transactions and contracts are ignored.
    pub fn write_event(&mut self, event: &ScanEvent) -> csv::Result<()> {
        match event {
            ScanEvent::Transaction(tx) => {
                open(&mut self.transactions, &self.transactions_path)?
                    .serialize(TransactionCsv::from(tx))
            }
            ScanEvent::Contract(contract) => {
                open(&mut self.contracts, &self.contracts_path)?
                    .serialize(ContractCsv::from(contract))
            }
            _ => Ok(()),
        }
    }

    /// Flushes both files and returns the paths that were written.
    pub fn finish(self) -> csv::Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        if let Some(mut wtr) = self.transactions {
            wtr.flush()?;
            written.push(self.transactions_path);
        }
        if let Some(mut wtr) = self.contracts {
            wtr.flush()?;
            written.push(self.contracts_path);
        }
        Ok(written)
    }
}

fn open<'a>(slot: &'a mut Option<Writer<File>>, path: &Path) -> csv::Result<&'a mut Writer<File>> {
    let wtr = match slot.take() {
        Some(wtr) => wtr,
        None => Writer::from_path(path)?,
    };
    Ok(slot.insert(wtr))
}

/// Writes the records of `events` through a [`CsvExporter`] and returns the
/// paths that were written.
pub fn export_events_csv<P: AsRef<Path>>(
    events: &[ScanEvent],
    path: P,
) -> csv::Result<Vec<PathBuf>> {
    let mut exporter = CsvExporter::new(path);
    for event in events {
        exporter.write_event(event)?;
    }
    exporter.finish()
}
