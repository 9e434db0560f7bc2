use crate::config::GMT_FORMAT;
use crate::models::{
    BlockRange, CodeRecord, ContractRecord, ScanEvent, ScanKind, ScanSummary, TransactionRecord,
};
use chrono::{DateTime, Utc};
use std::fmt;

impl ScanKind {
    fn heading(&self) -> &'static str {
        match self {
            ScanKind::Transactions => "+ Find transaction of: ",
            ScanKind::Contracts => "+ Account : ",
            ScanKind::ContractCreations => "+ Get All Contracts Creation Transaction Of : ",
        }
    }
}

impl fmt::Display for BlockRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Tx hash: {:?}", self.hash)?;
        writeln!(f, "Tx Information")?;
        writeln!(f, "\tnonce           : {}", self.nonce)?;
        writeln!(f, "\tblockHash       : {}", or_null(self.block_hash.map(|h| format!("{:?}", h))))?;
        writeln!(f, "\tblockNumber     : {}", or_null(self.block_number))?;
        writeln!(f, "\ttransactionIndex: {}", or_null(self.transaction_index))?;
        writeln!(f, "\tfrom            : {:?}", self.from)?;
        writeln!(f, "\tto              : {}", or_null(self.to.map(|a| format!("{:?}", a))))?;
        writeln!(f, "\tvalue           : {}", self.value)?;
        writeln!(f, "\ttime            : {}", time_line(self.timestamp, self.time))?;
        writeln!(f, "\tgasPrice        : {}", or_null(self.gas_price))?;
        writeln!(f, "\tgas             : {}", self.gas)?;
        write!(f, "\tinput           : {}", self.input)
    }
}

impl fmt::Display for ContractRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // creation listings separate records, the per-account contract listing does not
        if self.kind == ScanKind::ContractCreations {
            writeln!(f)?;
        }
        writeln!(f, "Contract:{:?}", self.contract_address)?;
        writeln!(f, "Transaction information:")?;
        writeln!(f, "Hash:{:?}", self.hash)?;
        writeln!(f, "Time:{}", time_line(self.timestamp, self.time))?;
        writeln!(f, "Input:{}", self.input)?;
        write!(f, "Bytes:{}", self.code)
    }
}

impl fmt::Display for CodeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bytes:{}", self.code)
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.total {
            Some(total) => write!(f, "\nTotal Transactions: {}", total),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ScanEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanEvent::Started {
                kind,
                account,
                range,
            } => {
                writeln!(f, "{}{}", kind.heading(), account)?;
                writeln!(f, "+ Scanning from Block: {}", range)?;
                write!(f, "+ Transactions")
            }
            ScanEvent::Account(account) => write!(f, "{}{}", ScanKind::Contracts.heading(), account),
            ScanEvent::Transaction(record) => fmt::Display::fmt(record, f),
            ScanEvent::Contract(record) => fmt::Display::fmt(record, f),
            ScanEvent::Code(record) => fmt::Display::fmt(record, f),
            ScanEvent::Finished(summary) => fmt::Display::fmt(summary, f),
        }
    }
}

fn or_null<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

fn time_line(timestamp: u64, time: Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => format!("{} {}", timestamp, time.format(GMT_FORMAT)),
        None => format!("{} Invalid Date", timestamp),
    }
}
