use crate::{error::ScanError, source::LedgerSource};
use ethers::types::{Address, Bytes, Transaction};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// The transaction has a recipient.
    Plain,
    /// The transaction has no recipient and deployed `contract_address`.
    Creation {
        contract_address: Address,
        code: Bytes,
    },
}

/// Splits transactions into plain calls and contract creations, resolving the
/// deployed contract and its current code for the latter.
pub struct TransactionClassifier<'a, S: ?Sized> {
    source: &'a S,
}

impl<'a, S> TransactionClassifier<'a, S>
where
    S: LedgerSource + ?Sized,
{
    pub fn new(source: &'a S) -> Self {
        TransactionClassifier { source }
    }

    /// Plain transactions cost no lookups. A creation costs exactly one receipt
    /// lookup and one code lookup, and fails if the receipt names no contract.
    pub async fn classify(&self, tx: &Transaction) -> Result<Classification, ScanError> {
        if tx.to.is_some() {
            return Ok(Classification::Plain);
        }

        let receipt = self
            .source
            .transaction_receipt(tx.hash)
            .await?
            .ok_or(ScanError::ReceiptUnavailable(tx.hash))?;
        let contract_address = receipt
            .contract_address
            .ok_or(ScanError::MissingContractAddress(tx.hash))?;

        let code = self.code_at(contract_address).await?;
        debug!(
            "Transaction {:?} created contract {:?} ({} bytes of code)",
            tx.hash,
            contract_address,
            code.len()
        );

        Ok(Classification::Creation {
            contract_address,
            code,
        })
    }

    pub async fn code_at(&self, address: Address) -> Result<Bytes, ScanError> {
        self.source.code_at(address).await
    }
}
