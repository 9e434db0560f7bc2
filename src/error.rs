use ethers::types::H256;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures that abort a scan.
///
/// Missing blocks and empty blocks are not errors; the scanner skips them.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The ledger source failed to answer a query.
    #[error("transport fault while {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// A contract-creation transaction has no receipt.
    #[error("receipt unavailable for creation transaction {0:?}")]
    ReceiptUnavailable(H256),

    /// The receipt of a contract-creation transaction names no contract.
    #[error("receipt for creation transaction {0:?} carries no contract address")]
    MissingContractAddress(H256),

    #[error("invalid account filter `{0}`")]
    InvalidFilter(String),
}

impl ScanError {
    pub fn transport(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ScanError::Transport {
            context: context.into(),
            source: source.into(),
        }
    }
}
