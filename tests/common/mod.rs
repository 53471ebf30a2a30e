#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const USDT_CHECKSUM: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
pub const ONE_ETHER_HEX: &str = "0xde0b6b3a7640000";

pub fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result,
    }))
}

pub fn legacy_tx(hash: &str, to: Option<&str>, value: &str) -> Value {
    json!({
        "hash": hash,
        "from": "0x1111111111111111111111111111111111111111",
        "to": to,
        "value": value,
        "gas": "0x5208",
        "gasPrice": "0x3b9aca00",
        "nonce": "0x1",
        "input": "0x",
        "type": "0x0",
        "blockHash": "0xblockhash",
        "blockNumber": "0x121eac0",
        "transactionIndex": "0x0"
    })
}

pub fn fee_market_tx(hash: &str, to: Option<&str>, value: &str) -> Value {
    json!({
        "hash": hash,
        "from": "0x3333333333333333333333333333333333333333",
        "to": to,
        "value": value,
        "gas": "0x186a0",
        "gasPrice": "0x5d21dba00",
        "maxFeePerGas": "0x9502f9000",
        "maxPriorityFeePerGas": "0x59682f00",
        "nonce": "0x2a",
        "input": "0xa9059cbb",
        "type": "0x2",
        "blockHash": "0xblockhash",
        "blockNumber": "0x121eac0",
        "transactionIndex": "0x1"
    })
}

/// Block 19000000 (0x121eac0)
pub fn block_json(transactions: Vec<Value>) -> Value {
    json!({
        "number": "0x121eac0",
        "hash": "0xblockhash",
        "parentHash": "0xparenthash",
        "timestamp": "0x65a7c0d3",
        "miner": "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5",
        "gasUsed": "0xbc614e",
        "gasLimit": "0x1c9c380",
        "baseFeePerGas": "0x4a817c800",
        "stateRoot": "0xstateroot",
        "receiptsRoot": "0xreceiptsroot",
        "logsBloom": "0x00",
        "mixHash": "0xmixhash",
        "extraData": "0x6265617665726275696c642e6f7267",
        "withdrawals": [],
        "transactions": transactions
    })
}

pub fn receipt_json(gas_used: &str, status: &str) -> Value {
    json!({
        "status": status,
        "gasUsed": gas_used,
        "cumulativeGasUsed": "0x100000",
        "contractAddress": null,
        "logs": [{ "address": USDT_CHECKSUM }]
    })
}

pub async fn mount_block(server: &MockServer, block: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_getBlockByNumber" })))
        .respond_with(rpc_result(block))
        .mount(server)
        .await;
}

pub async fn mount_receipt(server: &MockServer, tx_hash: &str, receipt: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "eth_getTransactionReceipt",
            "params": [tx_hash]
        })))
        .respond_with(rpc_result(receipt))
        .mount(server)
        .await;
}
