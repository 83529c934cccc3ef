//! End-to-end integration tests

use paper_ledger::config::Config;
use paper_ledger::data::read_records;
use paper_ledger::execution::{OrderRequest, OrderStatus, PaperEngine, Side};
use rust_decimal_macros::dec;

fn config_with_log(log: &std::path::Path) -> Config {
    let toml = format!(
        r#"
        [engine]
        initial_balance = 10000.0
        commission_rate = 0.001
        trade_log = "{}"

        [prices]
        seed = 42
        max_variation_bps = 200

        [telemetry]
        log_level = "info"
        "#,
        log.display()
    );
    toml::from_str(&toml).unwrap()
}

#[test]
fn test_session_writes_one_record_per_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("logs").join("paper_trading.jsonl");
    let config = config_with_log(&log);

    let mut engine = PaperEngine::from_config(&config);
    engine.start();

    let buy = engine.place_order(OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.1)));
    let sell = engine.place_order(OrderRequest::market("BTCUSDT", Side::Sell, dec!(0.05)));
    // Far below any sampled ETH price, so it rests
    let limit = engine.place_order(OrderRequest::limit(
        "ETHUSDT",
        Side::Buy,
        dec!(1.0),
        dec!(2000),
    ));
    let invalid = engine.place_order(OrderRequest::market("BTCUSDT", Side::Buy, dec!(0)));
    assert!(engine.cancel_order(&limit.id));
    engine.stop();

    assert_eq!(buy.status, OrderStatus::Filled);
    assert_eq!(sell.status, OrderStatus::Filled);
    assert_eq!(limit.status, OrderStatus::Pending);
    assert_eq!(invalid.status, OrderStatus::Rejected);

    let records = read_records(&log).unwrap();
    let outcomes: Vec<(String, OrderStatus)> = records
        .iter()
        .map(|r| (r.order_id.clone(), r.status))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("PAPER_000001".to_string(), OrderStatus::Filled),
            ("PAPER_000002".to_string(), OrderStatus::Filled),
            ("PAPER_000003".to_string(), OrderStatus::Pending),
            ("PAPER_000004".to_string(), OrderStatus::Rejected),
            ("PAPER_000003".to_string(), OrderStatus::Cancelled),
        ]
    );
    assert!(!records[3].notes.is_empty());
    assert_eq!(records[0].filled_quantity, Some(dec!(0.1)));
    assert_eq!(engine.trade_log().stats().records_written, 5);
}

#[test]
fn test_simulated_prices_hold_for_engine_lifetime() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_with_log(&dir.path().join("trades.jsonl"));
    let mut engine = PaperEngine::from_config(&config);

    let first = engine.place_order(OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.1)));
    let second = engine.place_order(OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.1)));
    assert_eq!(first.filled_price, second.filled_price);

    let price = first.filled_price.unwrap();
    assert!(price >= dec!(49000) && price <= dec!(51000));

    let summary = engine.get_account_summary().unwrap();
    assert_eq!(summary.positions["BTCUSDT"].unrealized_pnl, dec!(0));
    assert_eq!(summary.positions["BTCUSDT"].entry_price, price);
}

#[test]
fn test_example_config_loads() {
    let config = Config::load(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example")).unwrap();
    assert_eq!(config.engine.commission_rate, dec!(0.001));
    assert_eq!(config.prices.baselines["DOTUSDT"], dec!(20));
}
