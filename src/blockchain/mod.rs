pub mod rpc_client;
pub mod source;
pub mod block_processor;
pub mod block_monitor;

pub use rpc_client::{RpcClient, RpcBlock, RpcReceipt, RpcTransaction};
pub use source::BlockSource;
pub use block_processor::{BlockProcessor, ProcessedBlock};
pub use block_monitor::{stop_requested, BlockMonitor, BlockMonitorConfig, MonitorState, TickOutcome};
