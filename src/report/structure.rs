//! Fixed-shape JSON dumps of a block and of its first transactions.
//!
//! Consensus-layer fields cannot be served by an execution node, so they are
//! always present and hold [`SPECIAL_ACCESS`] instead of a value.

use serde::{Serialize, Serializer};

use crate::blockchain::ProcessedBlock;
use crate::models::units::{format_units_exact, ETHER_DECIMALS, GWEI_DECIMALS};
use crate::models::{BlockSummary, TransactionFees, TransactionRecord};
use crate::report::formatter::{format_timestamp, recipient_display};

pub const SPECIAL_ACCESS: &str = "Requires special API access";

pub const BLOCK_STRUCTURE_FILE: &str = "block_structure.json";
pub const TRANSACTIONS_STRUCTURE_FILE: &str = "transactions_structure.json";

/// Transactions embedded in the execution payload
pub const PAYLOAD_TRANSACTION_LIMIT: usize = 5;

/// Serializes as [`SPECIAL_ACCESS`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Restricted;

impl Serialize for Restricted {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(SPECIAL_ACCESS)
    }
}

fn ether_exact(wei: u128) -> String {
    format_units_exact(wei, ETHER_DECIMALS)
}

fn gwei_exact(wei: u128) -> String {
    format_units_exact(wei, GWEI_DECIMALS)
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockStructure {
    #[serde(rename = "Block Header")]
    pub header: BlockHeader,
    #[serde(rename = "Block Body")]
    pub body: BlockBody,
    #[serde(rename = "Attestations Data (Requires special API access)")]
    pub attestations: AttestationsData,
    #[serde(rename = "Withdrawals (Requires special API access)")]
    pub withdrawals: WithdrawalsData,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockHeader {
    pub slot: Restricted,
    pub proposer_index: Restricted,
    pub parent_root: String,
    pub state_root: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockBody {
    pub randao_reveal: Restricted,
    pub eth1_data: Restricted,
    pub graffiti: Restricted,
    pub proposer_slashings: Restricted,
    pub attester_slashings: Restricted,
    pub attestations: Restricted,
    pub deposits: Restricted,
    pub voluntary_exits: Restricted,
    pub sync_aggregate: Restricted,
    pub execution_payload: ExecutionPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionPayload {
    pub parent_hash: String,
    pub fee_recipient: String,
    pub state_root: String,
    pub receipts_root: String,
    pub logs_bloom: String,
    pub prev_randao: Option<String>,
    pub block_number: u64,
    pub gas_limit: u64,
    pub gas_used: u64,
    pub timestamp: String,
    pub extra_data: String,
    /// Gwei
    pub base_fee_per_gas: Option<String>,
    pub block_hash: String,
    pub transactions: Vec<PayloadTransaction>,
    pub withdrawals: Restricted,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PayloadTransaction {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Ether
    pub value: String,
    /// Gwei
    pub gas_price: String,
    pub nonce: u64,
    pub input: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AttestationsData {
    pub aggregation_bits: Restricted,
    pub data: AttestationData,
    pub signature: Restricted,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AttestationData {
    pub slot: Restricted,
    pub index: Restricted,
    pub beacon_block_root: Restricted,
    pub source: Restricted,
    pub target: Restricted,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WithdrawalsData {
    pub address: Restricted,
    pub amount: Restricted,
    pub index: Restricted,
    #[serde(rename = "validatorIndex")]
    pub validator_index: Restricted,
}

impl From<&TransactionRecord> for PayloadTransaction {
    fn from(tx: &TransactionRecord) -> Self {
        Self {
            hash: tx.hash.clone(),
            from: tx.from.clone(),
            to: recipient_display(tx).to_string(),
            value: ether_exact(tx.value),
            gas_price: gwei_exact(tx.gas_price()),
            nonce: tx.nonce,
            input: tx.input.clone(),
        }
    }
}

impl BlockStructure {
    pub fn from_block(block: &BlockSummary) -> Self {
        let execution_payload = ExecutionPayload {
            parent_hash: block.parent_hash.clone(),
            fee_recipient: block.miner.clone(),
            state_root: block.state_root.clone(),
            receipts_root: block.receipts_root.clone(),
            logs_bloom: block.logs_bloom.clone(),
            prev_randao: block.mix_hash.clone(),
            block_number: block.number,
            gas_limit: block.gas_limit,
            gas_used: block.gas_used,
            timestamp: format_timestamp(block.timestamp),
            extra_data: block.extra_data.clone(),
            base_fee_per_gas: block.base_fee_per_gas.map(gwei_exact),
            block_hash: block.hash.clone(),
            transactions: block
                .transactions
                .iter()
                .take(PAYLOAD_TRANSACTION_LIMIT)
                .map(PayloadTransaction::from)
                .collect(),
            withdrawals: Restricted,
        };

        Self {
            header: BlockHeader {
                slot: Restricted,
                proposer_index: Restricted,
                parent_root: block.parent_hash.clone(),
                state_root: block.state_root.clone(),
            },
            body: BlockBody {
                randao_reveal: Restricted,
                eth1_data: Restricted,
                graffiti: Restricted,
                proposer_slashings: Restricted,
                attester_slashings: Restricted,
                attestations: Restricted,
                deposits: Restricted,
                voluntary_exits: Restricted,
                sync_aggregate: Restricted,
                execution_payload,
            },
            attestations: AttestationsData::default(),
            withdrawals: WithdrawalsData::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionsStructure {
    pub block_number: u64,
    pub block_hash: String,
    pub timestamp: String,
    pub transactions_count: usize,
    pub transactions_processed: usize,
    pub transactions: Vec<TransactionDetail>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionDetail {
    pub hash: String,
    pub nonce: u64,
    pub block_hash: Option<String>,
    pub block_number: Option<u64>,
    pub transaction_index: Option<u64>,
    pub from: String,
    pub to: String,
    pub value: String,
    pub input: Option<String>,
    pub gas: u64,
    pub gas_price: String,
    pub receipt: ReceiptDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_fee_per_gas: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_priority_fee_per_gas: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptDetail {
    pub status: Option<u64>,
    pub gas_used: u64,
    pub cumulative_gas_used: u64,
    pub contract_address: Option<String>,
    pub logs_count: usize,
}

impl TransactionDetail {
    /// `None` unless the transaction carries a receipt
    pub fn from_enriched(tx: &TransactionRecord) -> Option<Self> {
        let receipt = tx.receipt.as_ref()?;

        let (max_fee_per_gas, max_priority_fee_per_gas) = match &tx.fees {
            TransactionFees::FeeMarket {
                max_fee_per_gas,
                max_priority_fee_per_gas,
                ..
            } => (Some(gwei_exact(*max_fee_per_gas)), Some(gwei_exact(*max_priority_fee_per_gas))),
            TransactionFees::Legacy { .. } => (None, None),
        };

        Some(Self {
            hash: tx.hash.clone(),
            nonce: tx.nonce,
            block_hash: tx.block_hash.clone(),
            block_number: tx.block_number,
            transaction_index: tx.transaction_index,
            from: tx.from.clone(),
            to: recipient_display(tx).to_string(),
            value: ether_exact(tx.value),
            input: tx.input.clone(),
            gas: tx.gas,
            gas_price: gwei_exact(tx.gas_price()),
            receipt: ReceiptDetail {
                status: receipt.status,
                gas_used: receipt.gas_used,
                cumulative_gas_used: receipt.cumulative_gas_used,
                contract_address: receipt.contract_address.clone(),
                logs_count: receipt.logs_count,
            },
            max_fee_per_gas,
            max_priority_fee_per_gas,
            tx_type: tx.tx_type,
        })
    }
}

impl TransactionsStructure {
    pub fn from_processed(processed: &ProcessedBlock) -> Self {
        let transactions: Vec<TransactionDetail> = processed
            .enriched
            .iter()
            .filter_map(TransactionDetail::from_enriched)
            .collect();

        Self {
            block_number: processed.block.number,
            block_hash: processed.block.hash.clone(),
            timestamp: format_timestamp(processed.block.timestamp),
            transactions_count: processed.block.transaction_count(),
            transactions_processed: transactions.len(),
            transactions,
        }
    }
}
