use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::models::DisplayLimit;

/// Placeholder substituted with the provider API key in `rpc.endpoint`
pub const API_KEY_PLACEHOLDER: &str = "{api_key}";

/// Environment variable holding the provider API key
pub const API_KEY_ENV: &str = "ALCHEMY_API_KEY";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub rpc: RpcConfig,
    pub monitor: MonitorConfig,
    pub display: DisplayConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// RPC client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Endpoint URL; `{api_key}` is replaced with `api_key`
    pub endpoint: String,
    /// Provider API key, normally supplied through the environment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

/// Poll loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Delay between head checks, roughly one block interval
    pub poll_interval_seconds: u64,
    /// Delay after a failed tick before trying again
    pub retry_delay_seconds: u64,
}

/// How many transactions the reports render
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub transaction_limit: usize,
    /// Ignore `transaction_limit` and render every transaction
    pub show_all: bool,
}

/// Where structure dumps are written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: format!("https://eth-mainnet.g.alchemy.com/v2/{}", API_KEY_PLACEHOLDER),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: 12,
            retry_delay_seconds: 5,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            transaction_limit: 5,
            show_all: false,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "blockchain_data".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl RpcConfig {
    /// Resolve the endpoint URL, substituting the API key when the endpoint needs one
    pub fn endpoint_url(&self) -> Result<String, ConfigError> {
        if !self.endpoint.contains(API_KEY_PLACEHOLDER) {
            return Ok(self.endpoint.clone());
        }

        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(self.endpoint.replace(API_KEY_PLACEHOLDER, key)),
            _ => Err(ConfigError::MissingEnvVar(API_KEY_ENV.to_string())),
        }
    }
}

impl DisplayConfig {
    pub fn limit(&self) -> DisplayLimit {
        if self.show_all {
            DisplayLimit::All
        } else {
            DisplayLimit::First(self.transaction_limit)
        }
    }

    pub fn set_limit(&mut self, limit: DisplayLimit) {
        match limit {
            DisplayLimit::All => self.show_all = true,
            DisplayLimit::First(n) => {
                self.show_all = false;
                self.transaction_limit = n;
            }
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables.
    /// Environment variables take precedence over file values.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the TOML file named by `CONFIG_FILE` (default `config.toml`)
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());

        if !Path::new(&config_path).exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ConfigError::FileNotFound(config_path.clone()))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parsing(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = env::var(API_KEY_ENV) {
            self.rpc.api_key = Some(key);
        }
        if let Ok(endpoint) = env::var("ETH_RPC_URL") {
            self.rpc.endpoint = endpoint;
        }
        if let Ok(timeout) = env::var("RPC_TIMEOUT_SECONDS") {
            self.rpc.timeout_seconds = parse_env("RPC_TIMEOUT_SECONDS", timeout)?;
        }

        if let Ok(interval) = env::var("MONITOR_POLL_INTERVAL") {
            self.monitor.poll_interval_seconds = parse_env("MONITOR_POLL_INTERVAL", interval)?;
        }
        if let Ok(delay) = env::var("MONITOR_RETRY_DELAY") {
            self.monitor.retry_delay_seconds = parse_env("MONITOR_RETRY_DELAY", delay)?;
        }

        if let Ok(limit) = env::var("DISPLAY_LIMIT") {
            let parsed = limit.parse::<DisplayLimit>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "DISPLAY_LIMIT".to_string(),
                    value: limit,
                })?;
            self.display.set_limit(parsed);
        }

        if let Ok(dir) = env::var("OUTPUT_DIR") {
            self.output.directory = dir;
        }

        if let Ok(level) = env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = env::var("LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.rpc.endpoint.starts_with("http://") && !self.rpc.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidUrl(self.rpc.endpoint.clone()));
        }

        // Fails fast when the key is required but absent
        self.rpc.endpoint_url()?;

        check_range("rpc.timeout_seconds", self.rpc.timeout_seconds, 1, 300)?;
        check_range("monitor.poll_interval_seconds", self.monitor.poll_interval_seconds, 1, 300)?;
        check_range("monitor.retry_delay_seconds", self.monitor.retry_delay_seconds, 1, 300)?;

        if !self.display.show_all && self.display.transaction_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "display.transaction_limit".to_string(),
                value: "0".to_string(),
            });
        }

        if self.output.directory.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "output.directory".to_string(),
                value: self.output.directory.clone(),
            });
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: self.logging.level.clone(),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: "logging.format".to_string(),
                value: self.logging.format.clone(),
            });
        }

        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample_config() -> Result<String, ConfigError> {
        toml::to_string_pretty(&Self::default())
            .map_err(|e| ConfigError::Parsing(e.to_string()))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn check_range(key: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
