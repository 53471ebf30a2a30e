use std::sync::Arc;

use crate::blockchain::BlockSource;
use crate::error::{ProcessingError, Result};
use crate::logging::{LogContext, MetricsLogger};
use crate::models::{BlockSelector, BlockSummary, DisplayLimit, TransactionRecord};

/// A fetched block plus the receipt-enriched sample of its transactions
#[derive(Debug, Clone)]
pub struct ProcessedBlock {
    pub block: BlockSummary,
    /// Transactions in scope whose receipt could be fetched, in block order
    pub enriched: Vec<TransactionRecord>,
}

impl ProcessedBlock {
    /// Transactions in scope that were dropped for lack of a receipt
    pub fn skipped_count(&self, limit: DisplayLimit) -> usize {
        limit.count(self.block.transaction_count()) - self.enriched.len()
    }
}

pub struct BlockProcessor<S: BlockSource> {
    source: Arc<S>,
}

impl<S: BlockSource> BlockProcessor<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn latest_block_number(&self) -> Result<u64> {
        self.source.latest_block_number().await
    }

    /// One `eth_getBlockByNumber` round trip with full transactions
    pub async fn fetch_block(&self, selector: BlockSelector) -> Result<BlockSummary> {
        LogContext::new("block_processor", "fetch_block")
            .with_metadata("selector", serde_json::json!(selector.to_string()))
            .debug(&format!("Fetching block {}", selector));

        self.source.block(selector).await
    }

    /// Fetch receipts one at a time for the transactions within `limit`.
    ///
    /// A failed or missing receipt drops that transaction only.
    pub async fn enrich(&self, block: &BlockSummary, limit: DisplayLimit) -> Vec<TransactionRecord> {
        let in_scope = limit.take(&block.transactions);
        let mut enriched = Vec::with_capacity(in_scope.len());

        for (index, tx) in in_scope.iter().enumerate() {
            LogContext::new("block_processor", "enrich")
                .with_block_number(block.number)
                .with_transaction_hash(&tx.hash)
                .trace(&format!("Processing transaction {}/{}", index + 1, in_scope.len()));

            match self.source.transaction_receipt(&tx.hash).await {
                Ok(Some(receipt)) => enriched.push(tx.clone().with_receipt(receipt)),
                Ok(None) => {
                    let reason = ProcessingError::MissingReceipt(tx.hash.clone());
                    MetricsLogger::log_receipt_skipped(&tx.hash, &reason.to_string());
                }
                Err(e) => MetricsLogger::log_receipt_skipped(&tx.hash, &e.to_string()),
            }
        }

        enriched
    }

    pub async fn process(&self, selector: BlockSelector, limit: DisplayLimit) -> Result<ProcessedBlock> {
        let block = self.fetch_block(selector).await?;
        let enriched = self.enrich(&block, limit).await;
        Ok(ProcessedBlock { block, enriched })
    }
}
