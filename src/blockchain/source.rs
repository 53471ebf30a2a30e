use async_trait::async_trait;

use crate::blockchain::RpcClient;
use crate::error::Result;
use crate::models::{BlockSelector, BlockSummary, ReceiptRecord};

/// Read access to chain data, as needed by the processor and the monitor
#[async_trait]
pub trait BlockSource: Send + Sync {
    async fn latest_block_number(&self) -> Result<u64>;

    async fn block(&self, selector: BlockSelector) -> Result<BlockSummary>;

    /// `Ok(None)` when the node has no receipt for `tx_hash`
    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptRecord>>;
}

#[async_trait]
impl BlockSource for RpcClient {
    async fn latest_block_number(&self) -> Result<u64> {
        self.get_latest_block_number().await
    }

    async fn block(&self, selector: BlockSelector) -> Result<BlockSummary> {
        self.get_block(selector).await
    }

    async fn transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptRecord>> {
        self.get_transaction_receipt(tx_hash).await
    }
}
