pub mod blockchain;
pub mod models;
pub mod report;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

pub use blockchain::{BlockMonitor, BlockProcessor, BlockSource, RpcClient};
pub use cli::{Cli, CliHandler, Commands};
pub use error::{ExplorerError, Result};
pub use logging::{LogContext, PerformanceMonitor, ErrorLogger, MetricsLogger};
pub use config::{AppConfig, RpcConfig, MonitorConfig, DisplayConfig, OutputConfig, LoggingConfig};
