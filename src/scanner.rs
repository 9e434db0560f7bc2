use crate::classifier::{Classification, TransactionClassifier};
use crate::error::ScanError;
use crate::filter::AccountFilter;
use crate::models::{
    BlockRange, CodeDumpPolicy, CodeRecord, ContractRecord, ScanEvent, ScanKind, ScanRequest,
    ScanSummary, TransactionRecord,
};
use crate::source::LedgerSource;
use ethers::types::{Address, Block, Transaction};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use log::{debug, error, info};
use std::collections::VecDeque;

pub type ScanStream<'a> = BoxStream<'a, Result<ScanEvent, ScanError>>;

/// Walks block ranges of a [`LedgerSource`] and reports the transactions that
/// match an [`AccountFilter`].
///
/// Every scan is sequential: a block and all receipt and code lookups for its
/// transactions complete before the next block is requested. Each call owns
/// its own counters, so scans running side by side never interfere.
pub struct Scanner<S> {
    source: S,
    code_dump: CodeDumpPolicy,
}

impl<S: LedgerSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        Scanner {
            source,
            code_dump: CodeDumpPolicy::default(),
        }
    }

    pub fn with_code_dump(mut self, code_dump: CodeDumpPolicy) -> Self {
        self.code_dump = code_dump;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fills in missing bounds. The chain head is queried at most once, here,
    /// so blocks produced while a scan runs never extend it.
    pub async fn resolve_range(&self, request: &ScanRequest) -> Result<BlockRange, ScanError> {
        let start = request.start.unwrap_or(0);
        let end = match request.end {
            Some(end) => end,
            None => self.source.current_height().await?,
        };
        Ok(BlockRange::new(start, end))
    }

    /// Non-empty blocks of `range`, ascending. Missing and empty blocks are
    /// skipped; a source fault ends the stream with that error.
    pub fn blocks(
        &self,
        range: BlockRange,
    ) -> impl Stream<Item = Result<Block<Transaction>, ScanError>> + Send + '_ {
        stream::try_unfold(Some(range.start), move |cursor| async move {
            let mut cursor = cursor;
            while let Some(number) = cursor.filter(|n| *n <= range.end) {
                cursor = number.checked_add(1);
                match self.source.block_with_transactions(number).await? {
                    Some(block) if !block.transactions.is_empty() => {
                        info!(
                            "Scanning block {} ({} transactions)",
                            number,
                            block.transactions.len()
                        );
                        return Ok(Some((block, cursor)));
                    }
                    Some(_) => debug!("Block {} has no transactions, skipping", number),
                    None => debug!("Block {} is not available, skipping", number),
                }
            }
            Ok::<_, ScanError>(None)
        })
    }

    /// Every transaction sent from or to the account, with a final count.
    pub fn transactions_by_account(&self, request: ScanRequest) -> ScanStream<'_> {
        self.scan(ScanKind::Transactions, request)
    }

    /// Contracts created by transactions matching the account. Announces the
    /// account once, before its first contract, and reports no count.
    pub fn contracts(&self, request: ScanRequest) -> ScanStream<'_> {
        self.scan(ScanKind::Contracts, request)
    }

    /// Contract-creation transactions matching the account, with a final count.
    pub fn contract_creations_by_account(&self, request: ScanRequest) -> ScanStream<'_> {
        self.scan(ScanKind::ContractCreations, request)
    }

    fn scan<'a>(&'a self, kind: ScanKind, request: ScanRequest) -> ScanStream<'a> {
        let opening = async move {
            let range = self.resolve_range(&request).await?;
            info!(
                "Scanning blocks {} to {} for {} ({:?})",
                range.start, range.end, request.account, kind
            );
            Ok::<_, ScanError>(ScanState::new(
                kind,
                request.account,
                range,
                self.blocks(range).boxed(),
            ))
        };

        stream::once(opening)
            .map_ok(move |state| stream::try_unfold(state, move |state| self.step(state)))
            .try_flatten()
            .inspect_err(|e| error!("Scan aborted: {}", e))
            .boxed()
    }

    async fn step<'a>(
        &'a self,
        mut state: ScanState<'a>,
    ) -> Result<Option<(ScanEvent, ScanState<'a>)>, ScanError> {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Ok(Some((event, state)));
            }
            if state.finished {
                return Ok(None);
            }
            let next = state.blocks.try_next().await?;
            match next {
                Some(block) => self.process_block(&mut state, &block).await?,
                None => {
                    let summary = state.summary();
                    info!("Scan of {} finished: {:?}", state.account, summary.total);
                    state.finished = true;
                    state.pending.push_back(ScanEvent::Finished(summary));
                }
            }
        }
    }

    async fn process_block(
        &self,
        state: &mut ScanState<'_>,
        block: &Block<Transaction>,
    ) -> Result<(), ScanError> {
        let timestamp = block.timestamp.low_u64();
        let account = state.account;

        for tx in block.transactions.iter().filter(|tx| account.matches(tx)) {
            match state.kind {
                ScanKind::Transactions => {
                    state.total += 1;
                    state
                        .pending
                        .push_back(ScanEvent::Transaction(TransactionRecord::new(tx, timestamp)));
                }
                ScanKind::Contracts | ScanKind::ContractCreations => {
                    self.process_contract_match(state, tx, timestamp).await?
                }
            }
        }
        Ok(())
    }

    async fn process_contract_match(
        &self,
        state: &mut ScanState<'_>,
        tx: &Transaction,
        timestamp: u64,
    ) -> Result<(), ScanError> {
        let classifier = TransactionClassifier::new(&self.source);

        match classifier.classify(tx).await? {
            Classification::Creation {
                contract_address,
                code,
            } => {
                match state.kind {
                    ScanKind::Contracts if !state.announced => {
                        state.announced = true;
                        state.pending.push_back(ScanEvent::Account(state.account));
                    }
                    ScanKind::ContractCreations => state.total += 1,
                    _ => {}
                }
                state.last_contract = Some(contract_address);
                state.pending.push_back(ScanEvent::Contract(ContractRecord::new(
                    state.kind,
                    tx,
                    timestamp,
                    contract_address,
                    code,
                )));
            }
            Classification::Plain => {
                if self.code_dump != CodeDumpPolicy::EveryMatch {
                    return Ok(());
                }
                if let Some(address) = state.last_contract {
                    let code = classifier.code_at(address).await?;
                    state.pending.push_back(ScanEvent::Code(CodeRecord {
                        transaction: tx.hash,
                        address,
                        code,
                    }));
                } else {
                    debug!(
                        "No contract resolved yet, nothing to dump for {:?}",
                        tx.hash
                    );
                }
            }
        }
        Ok(())
    }
}

struct ScanState<'a> {
    kind: ScanKind,
    account: AccountFilter,
    blocks: BoxStream<'a, Result<Block<Transaction>, ScanError>>,
    pending: VecDeque<ScanEvent>,
    total: usize,
    announced: bool,
    last_contract: Option<Address>,
    finished: bool,
}

impl<'a> ScanState<'a> {
    fn new(
        kind: ScanKind,
        account: AccountFilter,
        range: BlockRange,
        blocks: BoxStream<'a, Result<Block<Transaction>, ScanError>>,
    ) -> Self {
        let mut pending = VecDeque::new();
        if kind != ScanKind::Contracts {
            pending.push_back(ScanEvent::Started {
                kind,
                account,
                range,
            });
        }
        ScanState {
            kind,
            account,
            blocks,
            pending,
            total: 0,
            announced: false,
            last_contract: None,
            finished: false,
        }
    }

    fn summary(&self) -> ScanSummary {
        let total = match self.kind {
            ScanKind::Contracts => None,
            ScanKind::Transactions | ScanKind::ContractCreations => Some(self.total),
        };
        ScanSummary {
            kind: self.kind,
            total,
        }
    }
}
