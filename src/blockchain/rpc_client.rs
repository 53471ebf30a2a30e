use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ExplorerError, ProcessingError, Result, RpcError};
use crate::logging::{LogContext, MetricsLogger, PerformanceMonitor};
use crate::models::units::{parse_quantity_u128, parse_quantity_u64};
use crate::models::{BlockSelector, BlockSummary, ReceiptRecord, TransactionFees, TransactionRecord};

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<Value>,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<Value>,
    error: Option<JsonRpcError>,
    /// Null when the node could not parse the request
    #[allow(dead_code)]
    id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Block as returned by `eth_getBlockByNumber` with full transactions
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: String,
    pub miner: String,
    pub gas_used: String,
    pub gas_limit: String,
    pub base_fee_per_gas: Option<String>,
    pub state_root: String,
    pub receipts_root: String,
    pub logs_bloom: String,
    pub mix_hash: Option<String>,
    #[serde(default)]
    pub extra_data: String,
    pub withdrawals: Option<Vec<Value>>,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: String,
    pub gas: String,
    pub gas_price: Option<String>,
    pub max_fee_per_gas: Option<String>,
    pub max_priority_fee_per_gas: Option<String>,
    pub nonce: String,
    #[serde(default)]
    pub input: String,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub block_hash: Option<String>,
    pub block_number: Option<String>,
    pub transaction_index: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub status: Option<String>,
    pub gas_used: String,
    pub cumulative_gas_used: String,
    pub contract_address: Option<String>,
    #[serde(default)]
    pub logs: Vec<Value>,
}

#[derive(Clone)]
pub struct RpcClient {
    client: Client,
    endpoint: String,
    timeout_seconds: u64,
}

impl RpcClient {
    pub fn new(endpoint: String) -> Result<Self> {
        Self::new_with_timeout(endpoint, DEFAULT_TIMEOUT_SECONDS)
    }

    pub fn new_with_timeout(endpoint: String, timeout_seconds: u64) -> Result<Self> {
        let context = LogContext::new("rpc_client", "initialization")
            .with_metadata("timeout_seconds", serde_json::json!(timeout_seconds));
        context.debug("Initializing RPC client");

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(RpcError::Http)?;

        Ok(Self {
            client,
            endpoint,
            timeout_seconds,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn make_request(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        LogContext::new("rpc_client", "make_request")
            .with_metadata("method", serde_json::json!(method))
            .trace(&format!("Sending RPC request: {}", method));

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::RateLimit { seconds: 60 }.into());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RpcError::Authentication.into());
        }
        if !status.is_success() {
            let error_msg = format!("HTTP error: {} {}", status.as_u16(), status.canonical_reason().unwrap_or("Unknown"));
            return Err(RpcError::Connection(error_msg).into());
        }

        let body = response.text().await.map_err(|e| self.classify_transport_error(e))?;
        let rpc_response: JsonRpcResponse = serde_json::from_str(&body).map_err(RpcError::Json)?;

        if let Some(error) = rpc_response.error {
            let rpc_error = match error.code {
                -32700 => RpcError::InvalidResponse("Parse error".to_string()),
                -32600 => RpcError::InvalidResponse("Invalid request".to_string()),
                -32602 => RpcError::InvalidResponse(format!("Invalid params: {}", error.message)),
                _ => RpcError::Method { code: error.code, message: error.message },
            };
            return Err(rpc_error.into());
        }

        // A null result is legitimate for unknown blocks and pending receipts
        Ok(rpc_response.result.unwrap_or(Value::Null))
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> ExplorerError {
        let rpc_error = if e.is_timeout() {
            RpcError::Timeout { seconds: self.timeout_seconds }
        } else if e.is_connect() {
            RpcError::Connection(e.to_string())
        } else {
            RpcError::Http(e)
        };
        rpc_error.into()
    }

    /// `make_request` with timing and metrics
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let monitor = PerformanceMonitor::new(&format!("rpc_{}", method));
        let result = self.make_request(method, params).await;
        let duration = monitor.finish_with_result(&result);
        MetricsLogger::log_rpc_call(method, duration, result.is_ok());
        result
    }

    /// Current chain head (`eth_blockNumber`)
    pub async fn get_latest_block_number(&self) -> Result<u64> {
        let value = self.call("eth_blockNumber", vec![]).await?;

        let hex_string = value
            .as_str()
            .ok_or_else(|| RpcError::InvalidResponse("Block number is not a string".to_string()))?;
        let block_number = parse_quantity_u64(hex_string)?;

        LogContext::new("rpc_client", "get_latest_block_number")
            .with_block_number(block_number)
            .debug(&format!("Retrieved latest block number: {}", block_number));

        Ok(block_number)
    }

    /// Block with full transaction objects (`eth_getBlockByNumber`)
    pub async fn get_block(&self, selector: BlockSelector) -> Result<BlockSummary> {
        let params = vec![
            Value::String(selector.to_rpc_param()),
            Value::Bool(true),
        ];

        let value = self.call("eth_getBlockByNumber", params).await?;
        if value.is_null() {
            return Err(RpcError::BlockNotFound { block: selector.to_string() }.into());
        }

        let raw: RpcBlock = serde_json::from_value(value)
            .map_err(|e| ProcessingError::BlockParsing(format!("Failed to parse block {}: {}", selector, e)))?;
        let block = BlockSummary::try_from(raw)?;

        LogContext::new("rpc_client", "get_block")
            .with_block_number(block.number)
            .with_metadata("transaction_count", serde_json::json!(block.transactions.len()))
            .debug(&format!("Retrieved block {} with {} transactions", block.number, block.transactions.len()));

        Ok(block)
    }

    /// Receipt for a mined transaction; `None` when the node does not know it
    pub async fn get_transaction_receipt(&self, tx_hash: &str) -> Result<Option<ReceiptRecord>> {
        let value = self
            .call("eth_getTransactionReceipt", vec![Value::String(tx_hash.to_string())])
            .await?;
        if value.is_null() {
            return Ok(None);
        }

        let raw: RpcReceipt = serde_json::from_value(value)
            .map_err(|e| ProcessingError::ReceiptParsing(format!("Failed to parse receipt {}: {}", tx_hash, e)))?;
        Ok(Some(ReceiptRecord::try_from(raw)?))
    }
}

fn parse_optional_u64(value: Option<&String>) -> std::result::Result<Option<u64>, ProcessingError> {
    value.map(|v| parse_quantity_u64(v)).transpose()
}

fn parse_optional_u128(value: Option<&String>) -> std::result::Result<Option<u128>, ProcessingError> {
    value.map(|v| parse_quantity_u128(v)).transpose()
}

impl TryFrom<RpcBlock> for BlockSummary {
    type Error = ProcessingError;

    fn try_from(raw: RpcBlock) -> std::result::Result<Self, Self::Error> {
        let transactions = raw
            .transactions
            .into_iter()
            .map(TransactionRecord::try_from)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(BlockSummary {
            number: parse_quantity_u64(&raw.number)?,
            hash: raw.hash,
            parent_hash: raw.parent_hash,
            timestamp: parse_quantity_u64(&raw.timestamp)?,
            miner: raw.miner,
            gas_used: parse_quantity_u64(&raw.gas_used)?,
            gas_limit: parse_quantity_u64(&raw.gas_limit)?,
            base_fee_per_gas: parse_optional_u128(raw.base_fee_per_gas.as_ref())?,
            state_root: raw.state_root,
            receipts_root: raw.receipts_root,
            logs_bloom: raw.logs_bloom,
            mix_hash: raw.mix_hash,
            extra_data: raw.extra_data,
            withdrawals_count: raw.withdrawals.map(|w| w.len()),
            transactions,
        })
    }
}

impl TryFrom<RpcTransaction> for TransactionRecord {
    type Error = ProcessingError;

    fn try_from(raw: RpcTransaction) -> std::result::Result<Self, Self::Error> {
        let gas_price = parse_optional_u128(raw.gas_price.as_ref())?;

        let fees = match parse_optional_u128(raw.max_fee_per_gas.as_ref())? {
            Some(max_fee_per_gas) => TransactionFees::FeeMarket {
                gas_price: gas_price.unwrap_or(max_fee_per_gas),
                max_fee_per_gas,
                max_priority_fee_per_gas: parse_optional_u128(raw.max_priority_fee_per_gas.as_ref())?
                    .unwrap_or(0),
            },
            None => TransactionFees::Legacy {
                gas_price: gas_price.ok_or_else(|| {
                    ProcessingError::TransactionParsing(format!("Transaction {} has no gas price", raw.hash))
                })?,
            },
        };

        let input = if raw.input.is_empty() || raw.input == "0x" {
            None
        } else {
            Some(raw.input)
        };

        Ok(TransactionRecord {
            from: raw.from,
            to: raw.to,
            value: parse_quantity_u128(&raw.value)?,
            gas: parse_quantity_u64(&raw.gas)?,
            fees,
            nonce: parse_quantity_u64(&raw.nonce)?,
            input,
            tx_type: parse_optional_u64(raw.tx_type.as_ref())?,
            block_hash: raw.block_hash,
            block_number: parse_optional_u64(raw.block_number.as_ref())?,
            transaction_index: parse_optional_u64(raw.transaction_index.as_ref())?,
            receipt: None,
            hash: raw.hash,
        })
    }
}

impl TryFrom<RpcReceipt> for ReceiptRecord {
    type Error = ProcessingError;

    fn try_from(raw: RpcReceipt) -> std::result::Result<Self, Self::Error> {
        Ok(ReceiptRecord {
            status: parse_optional_u64(raw.status.as_ref())?,
            gas_used: parse_quantity_u64(&raw.gas_used)?,
            cumulative_gas_used: parse_quantity_u64(&raw.cumulative_gas_used)?,
            contract_address: raw.contract_address,
            logs_count: raw.logs.len(),
        })
    }
}
