use thiserror::Error;

/// Main error type for the block explorer
#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    #[error("Processing error: {0}")]
    Processing(#[from] ProcessingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),
}

/// RPC-related errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RPC method error: code={code}, message={message}")]
    Method { code: i32, message: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Rate limit exceeded, retry after {seconds} seconds")]
    RateLimit { seconds: u64 },

    #[error("Block not found: {block}")]
    BlockNotFound { block: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Authentication failed")]
    Authentication,
}

/// Errors raised while converting RPC payloads into records
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Block parsing failed: {0}")]
    BlockParsing(String),

    #[error("Transaction parsing failed: {0}")]
    TransactionParsing(String),

    #[error("Receipt parsing failed: {0}")]
    ReceiptParsing(String),

    #[error("Quantity parsing failed: {0}")]
    QuantityParsing(String),

    #[error("Receipt not available for transaction {0}")]
    MissingReceipt(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Configuration parsing failed: {0}")]
    Parsing(String),

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Errors writing dumps to disk
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Error severity levels for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// The process cannot continue
    Critical,
    /// A command failed
    High,
    /// A tick or a single record failed
    Medium,
    /// Mostly informational
    Low,
}

impl ExplorerError {
    /// Get the severity level of an error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ExplorerError::Config(_) => ErrorSeverity::Critical,
            ExplorerError::Output(OutputError::FileSystem(_)) => ErrorSeverity::Critical,

            ExplorerError::Rpc(RpcError::Connection(_)) => ErrorSeverity::High,
            ExplorerError::Rpc(RpcError::Authentication) => ErrorSeverity::High,

            ExplorerError::Rpc(RpcError::Timeout { .. }) => ErrorSeverity::Medium,
            ExplorerError::Rpc(RpcError::RateLimit { .. }) => ErrorSeverity::Medium,
            ExplorerError::Processing(_) => ErrorSeverity::Medium,

            ExplorerError::Rpc(RpcError::BlockNotFound { .. }) => ErrorSeverity::Low,
            _ => ErrorSeverity::Medium,
        }
    }

    /// Whether waiting and trying again can plausibly succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            ExplorerError::Rpc(RpcError::Timeout { .. }) => true,
            ExplorerError::Rpc(RpcError::RateLimit { .. }) => true,
            ExplorerError::Rpc(RpcError::Connection(_)) => true,
            ExplorerError::Rpc(RpcError::Http(_)) => true,
            ExplorerError::Rpc(RpcError::BlockNotFound { .. }) => true,

            ExplorerError::Config(_) => false,
            ExplorerError::Output(_) => false,
            ExplorerError::Rpc(RpcError::Authentication) => false,

            _ => false,
        }
    }
}
