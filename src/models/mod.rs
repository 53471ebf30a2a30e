pub mod block;
pub mod transaction;
pub mod known_contracts;
pub mod units;
pub mod stats;

pub use block::{BlockSelector, BlockSummary, DisplayLimit};
pub use transaction::{ReceiptRecord, TransactionFees, TransactionRecord};
pub use known_contracts::{KnownContractTable, COMMON_CONTRACTS};
pub use stats::AggregateStats;
