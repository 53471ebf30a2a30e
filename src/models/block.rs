use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::TransactionRecord;

/// Which block to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockSelector {
    #[default]
    Latest,
    Number(u64),
}

impl BlockSelector {
    /// The block parameter for `eth_getBlockByNumber`
    pub fn to_rpc_param(&self) -> String {
        match self {
            BlockSelector::Latest => "latest".to_string(),
            BlockSelector::Number(n) => format!("0x{:x}", n),
        }
    }
}

impl fmt::Display for BlockSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockSelector::Latest => write!(f, "latest"),
            BlockSelector::Number(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for BlockSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("latest") {
            return Ok(BlockSelector::Latest);
        }
        trimmed
            .parse::<u64>()
            .map(BlockSelector::Number)
            .map_err(|_| format!("expected 'latest' or a block number, got '{}'", s))
    }
}

/// How many transactions a report renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayLimit {
    First(usize),
    All,
}

impl DisplayLimit {
    /// Number of items shown out of `total`
    pub fn count(&self, total: usize) -> usize {
        match self {
            DisplayLimit::First(n) => total.min(*n),
            DisplayLimit::All => total,
        }
    }

    pub fn take<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[..self.count(items.len())]
    }
}

impl Default for DisplayLimit {
    fn default() -> Self {
        DisplayLimit::First(5)
    }
}

impl FromStr for DisplayLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(DisplayLimit::All);
        }
        trimmed
            .parse::<usize>()
            .map(DisplayLimit::First)
            .map_err(|_| format!("expected 'all' or a number, got '{}'", s))
    }
}

/// A block as returned with full transaction objects
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: u64,
    /// Fee recipient
    pub miner: String,
    pub gas_used: u64,
    pub gas_limit: u64,
    /// Only present after the fee market upgrade
    pub base_fee_per_gas: Option<u128>,
    pub state_root: String,
    pub receipts_root: String,
    pub logs_bloom: String,
    pub mix_hash: Option<String>,
    pub extra_data: String,
    pub withdrawals_count: Option<usize>,
    pub transactions: Vec<TransactionRecord>,
}

impl BlockSummary {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}
