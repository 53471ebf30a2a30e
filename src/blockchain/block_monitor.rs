use std::sync::Arc;
use std::time::Duration;

use log::info;
use serde_json::json;
use tokio::sync::watch;
use tokio::time::{sleep, Instant};

use crate::blockchain::{BlockProcessor, BlockSource, ProcessedBlock};
use crate::config::MonitorConfig;
use crate::error::Result;
use crate::logging::{ErrorLogger, LogContext, MetricsLogger};
use crate::models::{BlockSelector, DisplayLimit};

#[derive(Debug, Clone)]
pub struct BlockMonitorConfig {
    pub poll_interval: Duration,
    pub retry_delay: Duration,
    /// Transactions enriched per reported block
    pub display_limit: DisplayLimit,
}

impl BlockMonitorConfig {
    pub fn from_config(config: &MonitorConfig, display_limit: DisplayLimit) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
            display_limit,
        }
    }
}

impl Default for BlockMonitorConfig {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default(), DisplayLimit::default())
    }
}

/// Last block seen by the monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Watching(u64),
}

#[derive(Debug)]
pub enum TickOutcome {
    /// First head observed; nothing reported
    Initialized(u64),
    NoChange,
    NewBlock(ProcessedBlock),
}

pub struct BlockMonitor<S: BlockSource> {
    processor: BlockProcessor<S>,
    config: BlockMonitorConfig,
    state: MonitorState,
}

impl<S: BlockSource> BlockMonitor<S> {
    pub fn new(source: Arc<S>, config: BlockMonitorConfig) -> Self {
        Self {
            processor: BlockProcessor::new(source),
            config,
            state: MonitorState::Idle,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn config(&self) -> &BlockMonitorConfig {
        &self.config
    }

    /// Read the head once and advance the state machine.
    ///
    /// On error the state is left untouched, so the next tick resumes from
    /// the same marker. Only the head block is reported when several blocks
    /// arrived since the last tick.
    pub async fn tick(&mut self) -> Result<TickOutcome> {
        let head = self.processor.latest_block_number().await?;

        match self.state {
            MonitorState::Idle => {
                self.state = MonitorState::Watching(head);
                LogContext::new("block_monitor", "tick")
                    .with_block_number(head)
                    .debug("Recorded starting head");
                Ok(TickOutcome::Initialized(head))
            }
            MonitorState::Watching(last) if head > last => {
                let processed = self
                    .processor
                    .process(BlockSelector::Number(head), self.config.display_limit)
                    .await?;
                self.state = MonitorState::Watching(head);
                Ok(TickOutcome::NewBlock(processed))
            }
            MonitorState::Watching(_) => Ok(TickOutcome::NoChange),
        }
    }

    /// Poll until `shutdown` carries `true` or its sender is dropped.
    ///
    /// Successful ticks are followed by the poll interval, failed ones by the
    /// retry delay. Retries are unbounded.
    pub async fn run<F>(&mut self, mut shutdown: watch::Receiver<bool>, mut on_report: F)
    where
        F: FnMut(&ProcessedBlock),
    {
        info!(
            "Starting block monitor with {} second polling interval",
            self.config.poll_interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let started = Instant::now();
            let outcome = tokio::select! {
                outcome = self.tick() => outcome,
                _ = stop_requested(&mut shutdown) => break,
            };

            let delay = match outcome {
                Ok(TickOutcome::NewBlock(processed)) => {
                    MetricsLogger::log_block_reported(
                        processed.block.number,
                        processed.block.transaction_count(),
                        processed.enriched.len(),
                        started.elapsed().as_millis() as u64,
                    );
                    on_report(&processed);
                    self.config.poll_interval
                }
                Ok(_) => self.config.poll_interval,
                Err(e) => {
                    let context = LogContext::new("block_monitor", "tick")
                        .with_metadata("retry_delay_seconds", json!(self.config.retry_delay.as_secs()));
                    ErrorLogger::log_error(&e, Some(context));
                    self.config.retry_delay
                }
            };

            tokio::select! {
                _ = sleep(delay) => {}
                _ = stop_requested(&mut shutdown) => break,
            }
        }

        info!("Block monitor stopped");
    }
}

/// Resolves once a stop has been signalled
pub async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExplorerError, RpcError};
    use crate::models::{BlockSummary, ReceiptRecord};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays a scripted sequence of head readings; `None` is a failure
    struct ScriptedSource {
        heads: Mutex<VecDeque<Option<u64>>>,
        fetched: Mutex<Vec<u64>>,
    }

    impl ScriptedSource {
        fn new(heads: Vec<Option<u64>>) -> Arc<Self> {
            Arc::new(Self {
                heads: Mutex::new(heads.into()),
                fetched: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl BlockSource for ScriptedSource {
        async fn latest_block_number(&self) -> Result<u64> {
            match self.heads.lock().unwrap().pop_front().flatten() {
                Some(head) => Ok(head),
                None => Err(ExplorerError::Rpc(RpcError::Connection("unreachable".to_string()))),
            }
        }

        async fn block(&self, selector: BlockSelector) -> Result<BlockSummary> {
            let number = match selector {
                BlockSelector::Number(n) => n,
                BlockSelector::Latest => 0,
            };
            self.fetched.lock().unwrap().push(number);
            Ok(BlockSummary {
                number,
                hash: format!("0x{:x}", number),
                parent_hash: "0xparent".to_string(),
                timestamp: 0,
                miner: "0xminer".to_string(),
                gas_used: 0,
                gas_limit: 30_000_000,
                base_fee_per_gas: None,
                state_root: String::new(),
                receipts_root: String::new(),
                logs_bloom: String::new(),
                mix_hash: None,
                extra_data: String::new(),
                withdrawals_count: None,
                transactions: Vec::new(),
            })
        }

        async fn transaction_receipt(&self, _tx_hash: &str) -> Result<Option<ReceiptRecord>> {
            Ok(None)
        }
    }

    fn reported(outcome: &TickOutcome) -> Option<u64> {
        match outcome {
            TickOutcome::NewBlock(processed) => Some(processed.block.number),
            _ => None,
        }
    }

    #[tokio::test]
    async fn test_idle_records_head_without_reporting() {
        let source = ScriptedSource::new(vec![Some(100)]);
        let mut monitor = BlockMonitor::new(source.clone(), BlockMonitorConfig::default());

        assert_eq!(monitor.state(), MonitorState::Idle);
        let outcome = monitor.tick().await.unwrap();
        assert!(matches!(outcome, TickOutcome::Initialized(100)));
        assert_eq!(monitor.state(), MonitorState::Watching(100));
        assert!(source.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_head_sequence_reports_each_new_head_once() {
        let source = ScriptedSource::new(vec![Some(100), Some(100), Some(101), Some(101), Some(102)]);
        let mut monitor = BlockMonitor::new(source.clone(), BlockMonitorConfig::default());

        let mut reports = Vec::new();
        for _ in 0..5 {
            let outcome = monitor.tick().await.unwrap();
            reports.extend(reported(&outcome));
        }

        assert_eq!(reports, vec![101, 102]);
        assert_eq!(monitor.state(), MonitorState::Watching(102));
    }

    #[tokio::test]
    async fn test_head_jump_reports_only_the_head() {
        let source = ScriptedSource::new(vec![Some(100), Some(104)]);
        let mut monitor = BlockMonitor::new(source.clone(), BlockMonitorConfig::default());

        monitor.tick().await.unwrap();
        let outcome = monitor.tick().await.unwrap();
        assert_eq!(reported(&outcome), Some(104));
        assert_eq!(*source.fetched.lock().unwrap(), vec![104]);
    }

    #[tokio::test]
    async fn test_failure_leaves_state_unchanged() {
        let source = ScriptedSource::new(vec![Some(100), None, Some(101)]);
        let mut monitor = BlockMonitor::new(source.clone(), BlockMonitorConfig::default());

        monitor.tick().await.unwrap();
        assert!(monitor.tick().await.is_err());
        assert_eq!(monitor.state(), MonitorState::Watching(100));

        let outcome = monitor.tick().await.unwrap();
        assert_eq!(reported(&outcome), Some(101));
    }

    #[tokio::test]
    async fn test_initial_failure_stays_idle() {
        let source = ScriptedSource::new(vec![None, Some(100)]);
        let mut monitor = BlockMonitor::new(source, BlockMonitorConfig::default());

        assert!(monitor.tick().await.is_err());
        assert_eq!(monitor.state(), MonitorState::Idle);
        assert!(matches!(monitor.tick().await.unwrap(), TickOutcome::Initialized(100)));
    }

    #[tokio::test]
    async fn test_lower_head_is_ignored() {
        let source = ScriptedSource::new(vec![Some(100), Some(99)]);
        let mut monitor = BlockMonitor::new(source, BlockMonitorConfig::default());

        monitor.tick().await.unwrap();
        assert!(matches!(monitor.tick().await.unwrap(), TickOutcome::NoChange));
        assert_eq!(monitor.state(), MonitorState::Watching(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_on_signal() {
        let source = ScriptedSource::new(vec![Some(100); 100]);
        let mut monitor = BlockMonitor::new(source, BlockMonitorConfig::default());
        let (tx, rx) = watch::channel(false);

        let stopper = tokio::spawn(async move {
            sleep(Duration::from_secs(30)).await;
            tx.send(true).unwrap();
            // keep the sender alive until the monitor observes the value
            sleep(Duration::from_secs(3600)).await;
        });

        let mut count = 0;
        monitor.run(rx, |_| count += 1).await;
        assert_eq!(count, 0);
        stopper.abort();
    }

    #[test]
    fn test_config_from_monitor_config() {
        let config = BlockMonitorConfig::from_config(
            &MonitorConfig {
                poll_interval_seconds: 12,
                retry_delay_seconds: 5,
            },
            DisplayLimit::First(5),
        );
        assert_eq!(config.poll_interval, Duration::from_secs(12));
        assert_eq!(config.retry_delay, Duration::from_secs(5));
    }
}
