use chrono::{Local, TimeZone};
use serde::Serialize;

use crate::blockchain::ProcessedBlock;
use crate::models::units::{format_ether, format_gwei};
use crate::models::{AggregateStats, BlockSummary, DisplayLimit, KnownContractTable, ReceiptRecord, TransactionRecord};

/// Shown in place of the recipient of a contract deployment
pub const CONTRACT_CREATION: &str = "Contract Creation";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const RULE_WIDTH: usize = 50;

/// Unix seconds as local wall-clock time
pub fn format_timestamp(timestamp: u64) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: u64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match i64::try_from(timestamp).ok().and_then(|secs| tz.timestamp_opt(secs, 0).single()) {
        Some(datetime) => datetime.format(TIMESTAMP_FORMAT).to_string(),
        None => timestamp.to_string(),
    }
}

pub fn current_time() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn recipient_display(tx: &TransactionRecord) -> &str {
    tx.to.as_deref().unwrap_or(CONTRACT_CREATION)
}

fn receipt_for<'a>(processed: &'a ProcessedBlock, tx_hash: &str) -> Option<&'a ReceiptRecord> {
    processed
        .enriched
        .iter()
        .find(|tx| tx.hash == tx_hash)
        .and_then(|tx| tx.receipt.as_ref())
}

/// Normalized per-transaction record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionView {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value_eth: String,
    pub gas_price_gwei: String,
    pub gas_used: Option<u64>,
    pub contract_label: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatsView {
    pub total_value_eth: String,
    pub known_contract_calls: usize,
    pub unique_addresses: usize,
}

/// Normalized per-block record
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BlockView {
    pub number: u64,
    pub timestamp: String,
    pub hash: String,
    pub parent_hash: String,
    pub miner: String,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub transaction_count: usize,
    pub stats: StatsView,
    pub transactions: Vec<TransactionView>,
}

/// Renders blocks and transactions; owns the contract label table
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    contracts: KnownContractTable,
}

impl Formatter {
    pub fn new(contracts: KnownContractTable) -> Self {
        Self { contracts }
    }

    pub fn contracts(&self) -> &KnownContractTable {
        &self.contracts
    }

    pub fn aggregate(&self, block: &BlockSummary) -> AggregateStats {
        AggregateStats::compute(&block.transactions, &self.contracts)
    }

    pub fn contract_label(&self, tx: &TransactionRecord) -> Option<&str> {
        tx.to.as_deref().and_then(|to| self.contracts.label_for(to))
    }

    pub fn transaction_view(&self, tx: &TransactionRecord, receipt: Option<&ReceiptRecord>) -> TransactionView {
        TransactionView {
            hash: tx.hash.clone(),
            from: tx.from.clone(),
            to: recipient_display(tx).to_string(),
            value_eth: format_ether(tx.value),
            gas_price_gwei: format_gwei(tx.gas_price()),
            gas_used: receipt.or(tx.receipt.as_ref()).map(|r| r.gas_used),
            contract_label: self.contract_label(tx).map(str::to_string),
        }
    }

    pub fn block_view(&self, processed: &ProcessedBlock, limit: DisplayLimit) -> BlockView {
        let block = &processed.block;
        let stats = self.aggregate(block);

        BlockView {
            number: block.number,
            timestamp: format_timestamp(block.timestamp),
            hash: block.hash.clone(),
            parent_hash: block.parent_hash.clone(),
            miner: block.miner.clone(),
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
            transaction_count: block.transaction_count(),
            stats: StatsView {
                total_value_eth: stats.total_value_ether(),
                known_contract_calls: stats.known_contract_hits,
                unique_addresses: stats.unique_addresses,
            },
            transactions: limit
                .take(&block.transactions)
                .iter()
                .map(|tx| self.transaction_view(tx, receipt_for(processed, &tx.hash)))
                .collect(),
        }
    }

    pub fn render_json(&self, processed: &ProcessedBlock, limit: DisplayLimit) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.block_view(processed, limit))
    }

    fn transaction_lines(&self, view: &TransactionView) -> Vec<String> {
        let mut lines = vec![
            format!("Hash: {}", view.hash),
            format!("From: {}", view.from),
            format!("To: {}", view.to),
            format!("Value: {} ETH", view.value_eth),
            format!("Gas Price: {} Gwei", view.gas_price_gwei),
        ];
        if let Some(gas_used) = view.gas_used {
            lines.push(format!("Gas Used: {}", format_thousands(gas_used)));
        }
        if let Some(label) = &view.contract_label {
            lines.push(format!("Token: {}", label));
        }
        lines
    }

    /// Block report printed by `latest` and `monitor`
    pub fn render_block_report(&self, processed: &ProcessedBlock, limit: DisplayLimit) -> String {
        let view = self.block_view(processed, limit);
        let rule = "=".repeat(RULE_WIDTH);

        let mut lines = vec![
            String::new(),
            rule.clone(),
            format!("Block #{}", view.number),
            rule,
            format!("Time: {}", view.timestamp),
            format!("Block Hash: {}", view.hash),
            format!("Parent Hash: {}", view.parent_hash),
            format!("Miner: {}", view.miner),
            format!("Gas Used: {}", format_thousands(view.gas_used)),
            format!("Gas Limit: {}", format_thousands(view.gas_limit)),
            format!("Transactions: {}", view.transaction_count),
            String::new(),
            "Transaction Analysis:".to_string(),
            format!("Total ETH Transferred: {} ETH", view.stats.total_value_eth),
            format!("Known Contract Calls: {}", view.stats.known_contract_calls),
            format!("Unique Addresses: {}", view.stats.unique_addresses),
        ];

        if !view.transactions.is_empty() {
            lines.push(String::new());
            lines.push(format!("First {} Transactions:", view.transactions.len()));
        }

        for (i, tx) in view.transactions.iter().enumerate() {
            lines.push(String::new());
            lines.push(format!("Transaction #{}:", i + 1));
            lines.extend(self.transaction_lines(tx));
        }

        lines.join("\n")
    }

    /// Detailed listing printed by `explore`; only transactions with a receipt are listed
    pub fn render_explore_report(&self, processed: &ProcessedBlock, limit: DisplayLimit) -> String {
        let block = &processed.block;
        let total = block.transaction_count();

        let mut lines = vec![
            format!("Current Time: {}", current_time()),
            format!("Block Number: {}", block.number),
            String::new(),
            format!("Block {}:", block.number),
            format!("Timestamp: {}", format_timestamp(block.timestamp)),
            format!("Total Transactions: {}", total),
            format!("Gas Used: {}", block.gas_used),
        ];

        if total > 0 {
            lines.push(String::new());
            lines.push("Transactions in block order:".to_string());
        }

        for (i, tx) in limit.take(&block.transactions).iter().enumerate() {
            let Some(receipt) = receipt_for(processed, &tx.hash) else {
                continue;
            };
            lines.push(String::new());
            lines.push(format!("Transaction {}/{}:", i + 1, total));
            lines.extend(self.transaction_lines(&self.transaction_view(tx, Some(receipt))));
        }

        let not_shown = total - limit.count(total);
        if not_shown > 0 {
            lines.push(String::new());
            lines.push(format!("{} more transactions in this block were not shown.", not_shown));
        }

        lines.join("\n")
    }
}
