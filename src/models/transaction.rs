use serde::{Deserialize, Serialize};

/// A transaction as included in a block, optionally enriched with its receipt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionRecord {
    pub hash: String,
    pub from: String,
    /// `None` for contract creation
    pub to: Option<String>,
    /// Declared value in wei
    pub value: u128,
    /// Gas limit
    pub gas: u64,
    pub fees: TransactionFees,
    pub nonce: u64,
    /// Call data; `None` when the payload is empty
    pub input: Option<String>,
    pub tx_type: Option<u64>,
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub receipt: Option<ReceiptRecord>,
}

/// Fee fields, resolved once when the wire transaction is decoded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TransactionFees {
    Legacy {
        gas_price: u128,
    },
    FeeMarket {
        /// Effective price paid, as reported by the node
        gas_price: u128,
        max_fee_per_gas: u128,
        max_priority_fee_per_gas: u128,
    },
}

impl TransactionFees {
    pub fn gas_price(&self) -> u128 {
        match self {
            TransactionFees::Legacy { gas_price } => *gas_price,
            TransactionFees::FeeMarket { gas_price, .. } => *gas_price,
        }
    }
}

/// Post-execution outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceiptRecord {
    /// 1 success, 0 reverted; absent on pre-Byzantium receipts
    pub status: Option<u64>,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    pub contract_address: Option<String>,
    pub logs_count: usize,
}

impl TransactionRecord {
    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }

    pub fn gas_price(&self) -> u128 {
        self.fees.gas_price()
    }

    pub fn with_receipt(mut self, receipt: ReceiptRecord) -> Self {
        self.receipt = Some(receipt);
        self
    }
}
