use std::collections::HashMap;
use once_cell::sync::Lazy;

/// Well-known mainnet token contracts, used only to annotate output.
/// Labels are not authoritative.
pub const COMMON_CONTRACTS: &[(&str, &str)] = &[
    ("0xdAC17F958D2ee523a2206206994597C13D831ec7", "USDT"),
    ("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "USDC"),
    ("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "WETH"),
    ("0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "WBTC"),
    ("0x7D1AfA7B718fb893dB30A3aBc0Cfc608AaCfeBB0", "MATIC"),
    ("0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", "UNI"),
    ("0x6B175474E89094C44Da98b954EedeAC495271d0F", "DAI"),
];

static DEFAULT_TABLE: Lazy<KnownContractTable> = Lazy::new(|| {
    KnownContractTable::new(COMMON_CONTRACTS.iter().copied())
});

/// Immutable address to label lookup
#[derive(Debug, Clone, PartialEq)]
pub struct KnownContractTable {
    labels: HashMap<String, String>,
}

impl KnownContractTable {
    pub fn new<I, A, L>(entries: I) -> Self
    where
        I: IntoIterator<Item = (A, L)>,
        A: AsRef<str>,
        L: Into<String>,
    {
        let labels = entries
            .into_iter()
            .map(|(address, label)| (normalize_address(address.as_ref()), label.into()))
            .collect();
        Self { labels }
    }

    /// Label for `address`; matching ignores case and the `0x` prefix
    pub fn label_for(&self, address: &str) -> Option<&str> {
        self.labels.get(&normalize_address(address)).map(String::as_str)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.label_for(address).is_some()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for KnownContractTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// Lowercase, trimmed, without the `0x`/`0X` prefix
pub fn normalize_address(address: &str) -> String {
    let trimmed = address.trim();
    let without_prefix = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    without_prefix.to_lowercase()
}
