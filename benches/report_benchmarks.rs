use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use eth_block_explorer::blockchain::ProcessedBlock;
use eth_block_explorer::models::units::{format_ether, format_units_exact, ETHER_DECIMALS};
use eth_block_explorer::models::{
    AggregateStats, BlockSummary, DisplayLimit, KnownContractTable, ReceiptRecord, TransactionFees, TransactionRecord,
    COMMON_CONTRACTS,
};
use eth_block_explorer::report::{BlockStructure, Formatter};

fn create_test_transaction(id: u64) -> TransactionRecord {
    let to = match id % 4 {
        0 => None,
        1 => Some(COMMON_CONTRACTS[(id as usize) % COMMON_CONTRACTS.len()].0.to_string()),
        _ => Some(format!("0x{:040x}", id + 1)),
    };

    TransactionRecord {
        hash: format!("0x{:064x}", id),
        from: format!("0x{:040x}", id % 97),
        to,
        value: (id as u128 + 1) * 1_000_000_000_000_000,
        gas: 21_000,
        fees: TransactionFees::FeeMarket {
            gas_price: 25_000_000_000 + id as u128,
            max_fee_per_gas: 40_000_000_000,
            max_priority_fee_per_gas: 1_500_000_000,
        },
        nonce: id,
        input: None,
        tx_type: Some(2),
        block_hash: None,
        block_number: Some(19_000_000),
        transaction_index: Some(id),
        receipt: Some(ReceiptRecord {
            status: Some(1),
            gas_used: 21_000,
            cumulative_gas_used: 21_000 * (id + 1),
            contract_address: None,
            logs_count: 0,
        }),
    }
}

fn create_test_block(tx_count: u64) -> ProcessedBlock {
    let transactions: Vec<_> = (0..tx_count).map(create_test_transaction).collect();
    ProcessedBlock {
        enriched: transactions.iter().take(5).cloned().collect(),
        block: BlockSummary {
            number: 19_000_000,
            hash: format!("0x{:064x}", 19_000_000),
            parent_hash: format!("0x{:064x}", 18_999_999),
            timestamp: 1_705_492_691,
            miner: "0x95222290dd7278aa3ddd389cc1e1d165cc4bafe5".to_string(),
            gas_used: 15_000_000,
            gas_limit: 30_000_000,
            base_fee_per_gas: Some(20_000_000_000),
            state_root: "0xstate".to_string(),
            receipts_root: "0xreceipts".to_string(),
            logs_bloom: format!("0x{}", "0".repeat(512)),
            mix_hash: Some("0xmix".to_string()),
            extra_data: "0x".to_string(),
            withdrawals_count: Some(16),
            transactions,
        },
    }
}

fn bench_aggregate(c: &mut Criterion) {
    let table = KnownContractTable::default();
    let mut group = c.benchmark_group("aggregate");

    for size in [10, 150, 500].iter() {
        let processed = create_test_block(*size);
        group.bench_with_input(BenchmarkId::new("block", size), &processed, |b, processed| {
            b.iter(|| AggregateStats::compute(black_box(&processed.block.transactions), &table));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let formatter = Formatter::default();
    let processed = create_test_block(150);
    let mut group = c.benchmark_group("render");

    group.bench_function("block_report", |b| {
        b.iter(|| formatter.render_block_report(black_box(&processed), DisplayLimit::First(5)));
    });
    group.bench_function("explore_report_all", |b| {
        b.iter(|| formatter.render_explore_report(black_box(&processed), DisplayLimit::All));
    });
    group.bench_function("block_structure_json", |b| {
        b.iter(|| serde_json::to_string_pretty(&BlockStructure::from_block(black_box(&processed.block))));
    });

    group.finish();
}

fn bench_units(c: &mut Criterion) {
    c.bench_function("format_ether", |b| {
        b.iter(|| format_ether(black_box(123_456_789_012_345_678_901)));
    });
    c.bench_function("format_units_exact", |b| {
        b.iter(|| format_units_exact(black_box(1_500_000_000_000_000_000), ETHER_DECIMALS));
    });
}

criterion_group!(benches, bench_aggregate, bench_render, bench_units);
criterion_main!(benches);
