pub mod formatter;
pub mod structure;

pub use formatter::{format_timestamp, Formatter, CONTRACT_CREATION};
pub use structure::{BlockStructure, TransactionsStructure, SPECIAL_ACCESS};
