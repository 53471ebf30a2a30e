use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use log::info;
use tokio::sync::watch;

use crate::blockchain::{stop_requested, BlockMonitor, BlockMonitorConfig, BlockProcessor, BlockSource};
use crate::config::AppConfig;
use crate::error::{OutputError, Result};
use crate::models::{BlockSelector, DisplayLimit};
use crate::output::write_json;
use crate::report::structure::{BLOCK_STRUCTURE_FILE, TRANSACTIONS_STRUCTURE_FILE};
use crate::report::{BlockStructure, Formatter, TransactionsStructure};

/// Ethereum block and transaction explorer
#[derive(Parser, Debug)]
#[command(name = "eth-explorer", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Print a report for the latest block
    Latest {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Watch the chain and print a report for every new block
    Monitor,

    /// List a block's transactions together with their receipts
    Explore {
        /// Block number or "latest"
        #[arg(short, long, default_value = "latest")]
        block: BlockSelector,

        /// Number of transactions to list
        #[arg(short, long, conflicts_with = "all")]
        limit: Option<usize>,

        /// List every transaction in the block
        #[arg(long)]
        all: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Dump the block structure to block_structure.json
    BlockStructure {
        /// Block number or "latest"
        #[arg(short, long, default_value = "latest")]
        block: BlockSelector,

        /// Directory for the output file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Dump the first transactions with receipts to transactions_structure.json
    TxStructure {
        /// Block number or "latest"
        #[arg(short, long, default_value = "latest")]
        block: BlockSelector,

        /// Number of transactions to include
        #[arg(short, long, default_value_t = 5)]
        max_transactions: usize,

        /// Directory for the output file
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a sample configuration file
    Config,
}

/// Runs one command against a block source
pub struct CliHandler<S: BlockSource> {
    source: Arc<S>,
    config: AppConfig,
    formatter: Formatter,
}

impl<S: BlockSource> CliHandler<S> {
    pub fn new(source: Arc<S>, config: AppConfig) -> Self {
        Self {
            source,
            config,
            formatter: Formatter::default(),
        }
    }

    fn processor(&self) -> BlockProcessor<S> {
        BlockProcessor::new(Arc::clone(&self.source))
    }

    fn output_dir(&self, output_dir: &Option<PathBuf>) -> PathBuf {
        output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.config.output.directory))
    }

    /// Execute `command`; a stop signal ends the monitor cleanly and aborts one-shot commands
    pub async fn execute_command(&self, command: &Commands, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        if let Commands::Monitor = command {
            self.monitor(shutdown).await;
            return Ok(());
        }

        tokio::select! {
            result = self.run_once(command) => result,
            _ = stop_requested(&mut shutdown) => {
                info!("Interrupted");
                Ok(())
            }
        }
    }

    async fn run_once(&self, command: &Commands) -> Result<()> {
        match command {
            Commands::Latest { json } => self.latest(*json).await,
            Commands::Explore { block, limit, all, json } => {
                let limit = match (all, limit) {
                    (true, _) => DisplayLimit::All,
                    (false, Some(n)) => DisplayLimit::First(*n),
                    (false, None) => self.config.display.limit(),
                };
                self.explore(*block, limit, *json).await
            }
            Commands::BlockStructure { block, output_dir } => {
                self.block_structure(*block, &self.output_dir(output_dir)).await
            }
            Commands::TxStructure { block, max_transactions, output_dir } => {
                self.tx_structure(*block, *max_transactions, &self.output_dir(output_dir)).await
            }
            Commands::Config => {
                println!("{}", AppConfig::generate_sample_config()?);
                Ok(())
            }
            Commands::Monitor => Ok(()),
        }
    }

    async fn latest(&self, json: bool) -> Result<()> {
        let limit = self.config.display.limit();
        let processed = self.processor().process(BlockSelector::Latest, limit).await?;

        if json {
            println!("{}", self.formatter.render_json(&processed, limit).map_err(OutputError::from)?);
        } else {
            println!("{}", self.formatter.render_block_report(&processed, limit));
        }
        Ok(())
    }

    async fn monitor(&self, shutdown: watch::Receiver<bool>) {
        let limit = self.config.display.limit();
        let mut monitor = BlockMonitor::new(
            Arc::clone(&self.source),
            BlockMonitorConfig::from_config(&self.config.monitor, limit),
        );

        println!("Monitoring new blocks...");
        monitor
            .run(shutdown, |processed| {
                println!("{}", self.formatter.render_block_report(processed, limit));
            })
            .await;
        println!("\nStopped monitoring");
    }

    async fn explore(&self, block: BlockSelector, limit: DisplayLimit, json: bool) -> Result<()> {
        let processed = self.processor().process(block, limit).await?;

        if json {
            println!("{}", self.formatter.render_json(&processed, limit).map_err(OutputError::from)?);
        } else {
            println!("{}", self.formatter.render_explore_report(&processed, limit));
            println!("\nDone.");
        }
        Ok(())
    }

    async fn block_structure(&self, block: BlockSelector, output_dir: &Path) -> Result<()> {
        println!("Fetching block structure...");
        let summary = self.processor().fetch_block(block).await?;
        let structure = BlockStructure::from_block(&summary);

        print_structure("Block Structure", &structure)?;
        let path = write_json(output_dir, BLOCK_STRUCTURE_FILE, &structure)?;
        println!("\nData saved to {}", path.display());
        Ok(())
    }

    async fn tx_structure(&self, block: BlockSelector, max_transactions: usize, output_dir: &Path) -> Result<()> {
        println!("Fetching block transactions...");
        let processed = self
            .processor()
            .process(block, DisplayLimit::First(max_transactions))
            .await?;
        println!(
            "Found {} transactions in block {}, processed {}",
            processed.block.transaction_count(),
            processed.block.number,
            processed.enriched.len()
        );

        let structure = TransactionsStructure::from_processed(&processed);
        print_structure("Transactions Structure", &structure)?;
        let path = write_json(output_dir, TRANSACTIONS_STRUCTURE_FILE, &structure)?;
        println!("\nData saved to {}", path.display());
        Ok(())
    }
}

fn print_structure<T: serde::Serialize>(title: &str, value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(OutputError::from)?;
    println!("\n{}:\n{}", title, rendered);
    Ok(())
}
