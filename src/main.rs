use std::process;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tokio::signal;
use tokio::sync::watch;

use eth_block_explorer::config::AppConfig;
use eth_block_explorer::logging::{init_logging, ErrorLogger, LogContext};
use eth_block_explorer::{Cli, CliHandler, Commands, ExplorerError, RpcClient};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env is fine; the variables may come from the environment
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.command == Commands::Config {
        match AppConfig::generate_sample_config() {
            Ok(sample) => println!("{}", sample),
            Err(e) => {
                eprintln!("Failed to generate sample configuration: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let client = match config
        .rpc
        .endpoint_url()
        .map_err(ExplorerError::from)
        .and_then(|endpoint| RpcClient::new_with_timeout(endpoint, config.rpc.timeout_seconds))
    {
        Ok(client) => client,
        Err(e) => {
            ErrorLogger::log_error(&e, Some(LogContext::new("main", "initialization")));
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                error!("Unable to listen for shutdown signal: {}", err);
                // Dropping the sender would read as a stop request
                std::future::pending::<()>().await;
                drop(shutdown_tx);
            }
        }
    });

    let handler = CliHandler::new(Arc::new(client), config);
    if let Err(e) = handler.execute_command(&cli.command, shutdown_rx).await {
        ErrorLogger::log_error(&e, Some(LogContext::new("main", "execute_command")));
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
