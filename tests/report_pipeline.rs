mod common;

use std::sync::Arc;

use serde_json::Value;
use tokio_test::assert_ok;
use wiremock::MockServer;

use eth_block_explorer::blockchain::{BlockProcessor, RpcClient};
use eth_block_explorer::models::{BlockSelector, DisplayLimit};
use eth_block_explorer::report::Formatter;

use common::*;

async fn processor_for(server: &MockServer) -> BlockProcessor<RpcClient> {
    BlockProcessor::new(Arc::new(RpcClient::new_with_timeout(server.uri(), 5).unwrap()))
}

#[tokio::test]
async fn test_block_report_caps_at_five_and_labels_known_contracts() {
    let mock_server = MockServer::start().await;
    let usdt_lower = USDT_CHECKSUM.to_lowercase();
    let transactions = (0..8)
        .map(|i| {
            let hash = format!("0x{:02x}", i);
            match i {
                0 => legacy_tx(&hash, Some(USDT_CHECKSUM), ONE_ETHER_HEX),
                1 => legacy_tx(&hash, Some(&usdt_lower), "0x0"),
                2 => legacy_tx(&hash, None, "0x0"),
                _ => legacy_tx(&hash, Some("0x2222222222222222222222222222222222222222"), ONE_ETHER_HEX),
            }
        })
        .collect();
    mount_block(&mock_server, block_json(transactions)).await;
    for i in 0..5 {
        mount_receipt(&mock_server, &format!("0x{:02x}", i), receipt_json("0x5208", "0x1")).await;
    }

    let processor = processor_for(&mock_server).await;
    let processed = assert_ok!(processor.process(BlockSelector::Latest, DisplayLimit::First(5)).await);
    assert_eq!(processed.enriched.len(), 5);

    let formatter = Formatter::default();
    let report = formatter.render_block_report(&processed, DisplayLimit::First(5));

    assert_eq!(report.matches("Transaction #").count(), 5);
    assert_eq!(report.matches("Token: USDT").count(), 2);
    assert!(report.contains("To: Contract Creation"));
    assert!(report.contains("Block #19000000"));
    assert!(report.contains("Gas Used: 12,345,678"));
    assert!(report.contains("Transactions: 8"));
    // 1 + 5 ether across every transaction, not just the displayed ones
    assert!(report.contains("Total ETH Transferred: 6.00000000 ETH"));
    assert!(report.contains("Known Contract Calls: 2"));
    // sender, USDT, 0x2222...
    assert!(report.contains("Unique Addresses: 3"));
    assert!(report.contains("Gas Price: 1.00 Gwei"));
}

#[tokio::test]
async fn test_reverted_transaction_value_still_counts() {
    let mock_server = MockServer::start().await;
    mount_block(&mock_server, block_json(vec![legacy_tx("0xaaa", Some(USDT_CHECKSUM), ONE_ETHER_HEX)])).await;
    mount_receipt(&mock_server, "0xaaa", receipt_json("0x5208", "0x0")).await;

    let processed = processor_for(&mock_server)
        .await
        .process(BlockSelector::Latest, DisplayLimit::First(5))
        .await
        .unwrap();
    assert_eq!(processed.enriched[0].receipt.as_ref().unwrap().status, Some(0));

    let stats = Formatter::default().aggregate(&processed.block);
    assert_eq!(stats.total_value_ether(), "1.00000000");
}

#[tokio::test]
async fn test_explore_json_record() {
    let mock_server = MockServer::start().await;
    mount_block(
        &mock_server,
        block_json(vec![
            legacy_tx("0xaaa", Some(USDT_CHECKSUM), ONE_ETHER_HEX),
            legacy_tx("0xbbb", None, "0x0"),
        ]),
    )
    .await;
    mount_receipt(&mock_server, "0xaaa", receipt_json("0x5208", "0x1")).await;

    let processed = processor_for(&mock_server)
        .await
        .process(BlockSelector::Number(19_000_000), DisplayLimit::All)
        .await
        .unwrap();

    // 0xbbb has no receipt mock and is skipped
    assert_eq!(processed.enriched.len(), 1);

    let json = Formatter::default().render_json(&processed, DisplayLimit::All).unwrap();
    let record: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(record["transaction_count"], 2);
    assert_eq!(record["transactions"][0]["contract_label"], "USDT");
    assert_eq!(record["transactions"][0]["gas_used"], 21_000);
    assert_eq!(record["transactions"][1]["to"], "Contract Creation");
    assert_eq!(record["transactions"][1]["gas_used"], Value::Null);
}
