use crate::filter::AccountFilter;
use chrono::{DateTime, Utc};
use ethers::types::{Address, Bytes, Transaction, H256, U256};
use serde::Serialize;

/// Closed interval of block numbers. `start > end` is an empty range, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockRange {
    pub start: u64,
    pub end: u64,
}

impl BlockRange {
    pub fn new(start: u64, end: u64) -> Self {
        BlockRange { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// What the caller asks a scan for. Missing bounds default to block 0 and the
/// chain head at the time the scan starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub account: AccountFilter,
    pub start: Option<u64>,
    pub end: Option<u64>,
}

impl ScanRequest {
    pub fn new(account: AccountFilter) -> Self {
        ScanRequest {
            account,
            start: None,
            end: None,
        }
    }

    pub fn from_block(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    pub fn to_block(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn between(account: AccountFilter, start: Option<u64>, end: Option<u64>) -> Self {
        ScanRequest {
            account,
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScanKind {
    /// Every matching transaction, counted.
    Transactions,
    /// Matching contract creations with a one-time account banner, uncounted.
    Contracts,
    /// Matching contract creations, counted.
    ContractCreations,
}

/// When the contract-oriented scans dump deployed bytecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CodeDumpPolicy {
    /// Only for contract-creation transactions.
    #[default]
    CreationsOnly,
    /// For every matched transaction. Plain transactions dump the code of the
    /// contract most recently created in the same scan, as the legacy helper
    /// scripts did.
    EveryMatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub hash: H256,
    pub nonce: U256,
    pub block_hash: Option<H256>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub from: Address,
    pub to: Option<Address>,
    pub value: U256,
    pub timestamp: u64,
    pub time: Option<DateTime<Utc>>,
    pub gas_price: Option<U256>,
    pub gas: U256,
    pub input: Bytes,
}

impl TransactionRecord {
    pub fn new(tx: &Transaction, timestamp: u64) -> Self {
        TransactionRecord {
            hash: tx.hash,
            nonce: tx.nonce,
            block_hash: tx.block_hash,
            block_number: tx.block_number.map(|n| n.as_u64()),
            transaction_index: tx.transaction_index.map(|i| i.as_u64()),
            from: tx.from,
            to: tx.to,
            value: tx.value,
            timestamp,
            time: block_time(timestamp),
            gas_price: tx.gas_price,
            gas: tx.gas,
            input: tx.input.clone(),
        }
    }
}

/// A contract-creation transaction together with the contract it deployed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContractRecord {
    /// Scan that produced the record; decides how it is printed.
    pub kind: ScanKind,
    pub contract_address: Address,
    pub hash: H256,
    pub from: Address,
    pub block_number: Option<u64>,
    pub timestamp: u64,
    pub time: Option<DateTime<Utc>>,
    pub input: Bytes,
    pub code: Bytes,
}

impl ContractRecord {
    pub fn new(
        kind: ScanKind,
        tx: &Transaction,
        timestamp: u64,
        contract_address: Address,
        code: Bytes,
    ) -> Self {
        ContractRecord {
            kind,
            contract_address,
            hash: tx.hash,
            from: tx.from,
            block_number: tx.block_number.map(|n| n.as_u64()),
            timestamp,
            time: block_time(timestamp),
            input: tx.input.clone(),
            code,
        }
    }
}

/// Bytecode dumped for a matched transaction that created nothing itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeRecord {
    pub transaction: H256,
    pub address: Address,
    pub code: Bytes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub kind: ScanKind,
    /// `None` for [`ScanKind::Contracts`], which never reports a total.
    pub total: Option<usize>,
}

/// One item of a scan's output, in the order it was produced.
///
/// A scan that ran to completion always ends with [`ScanEvent::Finished`]; a
/// scan that hit a fault ends with the error instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ScanEvent {
    Started {
        kind: ScanKind,
        account: AccountFilter,
        range: BlockRange,
    },
    /// First matched creation of a [`ScanKind::Contracts`] scan.
    Account(AccountFilter),
    Transaction(TransactionRecord),
    Contract(ContractRecord),
    Code(CodeRecord),
    Finished(ScanSummary),
}

pub fn block_time(timestamp: u64) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}
