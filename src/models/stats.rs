use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::known_contracts::normalize_address;
use crate::models::units::format_ether;
use crate::models::{KnownContractTable, TransactionRecord};

/// Per-block summary over every transaction in the block
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AggregateStats {
    /// Sum of declared values in wei. Receipts are not consulted, so
    /// reverted transactions still count.
    pub total_value_wei: u128,
    /// Transactions whose recipient is in the known contract table
    pub known_contract_hits: usize,
    /// Distinct senders and recipients
    pub unique_addresses: usize,
}

impl AggregateStats {
    pub fn compute(transactions: &[TransactionRecord], contracts: &KnownContractTable) -> Self {
        let mut total_value_wei: u128 = 0;
        let mut known_contract_hits = 0;
        let mut addresses = HashSet::new();

        for tx in transactions {
            total_value_wei = total_value_wei.saturating_add(tx.value);

            addresses.insert(normalize_address(&tx.from));
            if let Some(to) = &tx.to {
                if contracts.contains(to) {
                    known_contract_hits += 1;
                }
                addresses.insert(normalize_address(to));
            }
        }

        Self {
            total_value_wei,
            known_contract_hits,
            unique_addresses: addresses.len(),
        }
    }

    pub fn total_value_ether(&self) -> String {
        format_ether(self.total_value_wei)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReceiptRecord, TransactionFees};

    const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

    fn tx(from: &str, to: Option<&str>, value: u128) -> TransactionRecord {
        TransactionRecord {
            hash: format!("0x{}{}", from, value),
            from: from.to_string(),
            to: to.map(str::to_string),
            value,
            gas: 21_000,
            fees: TransactionFees::Legacy { gas_price: 1 },
            nonce: 0,
            input: None,
            tx_type: None,
            block_hash: None,
            block_number: None,
            transaction_index: None,
            receipt: None,
        }
    }

    #[test]
    fn test_empty_block() {
        let stats = AggregateStats::compute(&[], &KnownContractTable::default());
        assert_eq!(stats, AggregateStats::default());
        assert_eq!(stats.total_value_ether(), "0.00000000");
    }

    #[test]
    fn test_totals_hits_and_unique_addresses() {
        let txs = vec![
            tx("0xaaa", Some("0xbbb"), 1_000_000_000_000_000_000),
            tx("0xaaa", Some(USDT), 0),
            tx("0xBBB", Some("0xDAC17F958D2EE523A2206206994597C13D831EC7"), 500_000_000_000_000_000),
            tx("0xccc", None, 0),
        ];

        let stats = AggregateStats::compute(&txs, &KnownContractTable::default());
        assert_eq!(stats.total_value_ether(), "1.50000000");
        assert_eq!(stats.known_contract_hits, 2);
        // aaa, bbb, usdt, ccc
        assert_eq!(stats.unique_addresses, 4);
    }

    #[test]
    fn test_reverted_transactions_still_count_toward_total_value() {
        let reverted = tx("0xaaa", Some("0xbbb"), 2_000_000_000_000_000_000).with_receipt(ReceiptRecord {
            status: Some(0),
            gas_used: 30_000,
            cumulative_gas_used: 30_000,
            contract_address: None,
            logs_count: 0,
        });

        let stats = AggregateStats::compute(&[reverted], &KnownContractTable::default());
        assert_eq!(stats.total_value_wei, 2_000_000_000_000_000_000);
    }
}
