use crate::error::ScanError;
use async_trait::async_trait;
use ethers::providers::Middleware;
use ethers::types::{Address, Block, Bytes, Transaction, TransactionReceipt, H256};
use std::sync::Arc;

/// Read-only view of an already-synced ledger.
///
/// The scanner owns no transport logic: retries, timeouts and connection
/// handling belong to the implementation behind this trait.
#[async_trait]
pub trait LedgerSource: Send + Sync {
    /// Height of the current chain head.
    async fn current_height(&self) -> Result<u64, ScanError>;

    /// Block `number` with full transaction bodies, `None` when the node has no such block.
    async fn block_with_transactions(
        &self,
        number: u64,
    ) -> Result<Option<Block<Transaction>>, ScanError>;

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ScanError>;

    /// Bytecode currently stored at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes, ScanError>;
}

#[async_trait]
impl<S: LedgerSource + ?Sized> LedgerSource for Arc<S> {
    async fn current_height(&self) -> Result<u64, ScanError> {
        (**self).current_height().await
    }

    async fn block_with_transactions(
        &self,
        number: u64,
    ) -> Result<Option<Block<Transaction>>, ScanError> {
        (**self).block_with_transactions(number).await
    }

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ScanError> {
        (**self).transaction_receipt(hash).await
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ScanError> {
        (**self).code_at(address).await
    }
}

/// Adapts any `ethers` middleware stack (usually `Provider<Http>`) to a [`LedgerSource`].
pub struct ProviderSource<M> {
    provider: Arc<M>,
}

impl<M> ProviderSource<M> {
    pub fn new(provider: Arc<M>) -> Self {
        ProviderSource { provider }
    }
}

#[async_trait]
impl<M> LedgerSource for ProviderSource<M>
where
    M: Middleware + 'static,
    M::Error: 'static,
{
    async fn current_height(&self) -> Result<u64, ScanError> {
        self.provider
            .get_block_number()
            .await
            .map(|number| number.as_u64())
            .map_err(|e| ScanError::transport("querying the chain head", e))
    }

    async fn block_with_transactions(
        &self,
        number: u64,
    ) -> Result<Option<Block<Transaction>>, ScanError> {
        self.provider
            .get_block_with_txs(number)
            .await
            .map_err(|e| ScanError::transport(format!("fetching block {}", number), e))
    }

    async fn transaction_receipt(
        &self,
        hash: H256,
    ) -> Result<Option<TransactionReceipt>, ScanError> {
        self.provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| ScanError::transport(format!("fetching receipt {:?}", hash), e))
    }

    async fn code_at(&self, address: Address) -> Result<Bytes, ScanError> {
        self.provider
            .get_code(address, None)
            .await
            .map_err(|e| ScanError::transport(format!("fetching code at {:?}", address), e))
    }
}
