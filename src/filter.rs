use crate::{config::WILDCARD, error::ScanError};
use ethers::types::{Address, Transaction};
use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};

/// Selects which transactions a scan reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountFilter {
    /// Every transaction matches.
    Wildcard,
    /// Transactions sent from or to this address match.
    Account(Address),
}

impl AccountFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            AccountFilter::Wildcard => true,
            AccountFilter::Account(account) => tx.from == *account || tx.to == Some(*account),
        }
    }
}

impl FromStr for AccountFilter {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == WILDCARD {
            return Ok(AccountFilter::Wildcard);
        }
        s.parse::<Address>()
            .map(AccountFilter::Account)
            .map_err(|_| ScanError::InvalidFilter(s.to_string()))
    }
}

impl From<Address> for AccountFilter {
    fn from(address: Address) -> Self {
        AccountFilter::Account(address)
    }
}

impl fmt::Display for AccountFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountFilter::Wildcard => f.write_str(WILDCARD),
            // Debug prints the full address, Display abbreviates it
            AccountFilter::Account(address) => write!(f, "{:?}", address),
        }
    }
}

impl Serialize for AccountFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
