//! Ledger properties of the paper engine

use paper_ledger::execution::{OrderRequest, OrderStatus, PaperEngine, Side};
use paper_ledger::feed::ManualPriceSource;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn engine(commission_rate: Decimal) -> (PaperEngine, Arc<ManualPriceSource>) {
    let prices = Arc::new(ManualPriceSource::new());
    let engine = PaperEngine::new(dec!(10000), commission_rate, prices.clone());
    (engine, prices)
}

fn market(engine: &mut PaperEngine, symbol: &str, side: Side, quantity: Decimal) {
    let order = engine.place_order(OrderRequest::market(symbol, side, quantity));
    assert_eq!(order.status, OrderStatus::Filled, "{}", order.note);
}

#[test]
fn test_end_to_end_market_buy() {
    let (mut engine, prices) = engine(dec!(0.001));
    prices.set_price("BTCUSDT", dec!(50000));

    market(&mut engine, "BTCUSDT", Side::Buy, dec!(0.1));

    let summary = engine.get_account_summary().unwrap();
    assert_eq!(summary.balance, dec!(4995.0));
    assert_eq!(summary.total_trades, 1);
    assert_eq!(summary.winning_trades, 0);
    assert_eq!(summary.losing_trades, 0);

    let position = &summary.positions["BTCUSDT"];
    assert_eq!(position.side, Side::Buy);
    assert_eq!(position.quantity, dec!(0.1));
    assert_eq!(position.entry_price, dec!(50000));
}

#[test]
fn test_cash_conservation_without_commission() {
    let (mut engine, prices) = engine(dec!(0));
    let fills = [
        ("BTCUSDT", Side::Buy, dec!(0.2), dec!(50000)),
        ("ETHUSDT", Side::Sell, dec!(1.5), dec!(3000)),
        ("BTCUSDT", Side::Sell, dec!(0.3), dec!(51000)),
        ("ETHUSDT", Side::Buy, dec!(0.5), dec!(2950)),
        ("BTCUSDT", Side::Buy, dec!(0.1), dec!(49500)),
    ];

    let mut expected = dec!(10000);
    for (symbol, side, quantity, price) in fills {
        prices.set_price(symbol, price);
        market(&mut engine, symbol, side, quantity);
        match side {
            Side::Buy => expected -= quantity * price,
            Side::Sell => expected += quantity * price,
        }
    }

    let summary = engine.get_account_summary().unwrap();
    assert_eq!(summary.balance, expected);
    assert_eq!(summary.total_trades, 5);
}

#[test]
fn test_positions_never_reach_zero_quantity() {
    let (mut engine, prices) = engine(dec!(0.001));
    prices.set_price("DOTUSDT", dec!(20));

    let steps = [
        (Side::Buy, dec!(3)),
        (Side::Sell, dec!(1)),
        (Side::Sell, dec!(2)),
        (Side::Sell, dec!(4)),
        (Side::Buy, dec!(4)),
        (Side::Buy, dec!(1)),
    ];
    for (side, quantity) in steps {
        market(&mut engine, "DOTUSDT", side, quantity);
        for position in engine.account().ledger.positions.iter() {
            assert!(position.quantity > Decimal::ZERO);
        }
    }

    let position = engine.position("DOTUSDT").unwrap();
    assert_eq!(position.side, Side::Buy);
    assert_eq!(position.quantity, dec!(1));
}

#[test]
fn test_flip_realizes_closed_leg() {
    let (mut engine, prices) = engine(dec!(0));
    prices.set_price("BTCUSDT", dec!(100));
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(1.0));

    prices.set_price("BTCUSDT", dec!(110));
    market(&mut engine, "BTCUSDT", Side::Sell, dec!(1.5));

    let summary = engine.get_account_summary().unwrap();
    assert_eq!(summary.total_pnl, dec!(10));
    assert_eq!(summary.winning_trades, 1);

    let position = &summary.positions["BTCUSDT"];
    assert_eq!(position.side, Side::Sell);
    assert_eq!(position.quantity, dec!(0.5));
    assert_eq!(position.entry_price, dec!(110));

    let history = engine.get_trade_history(10);
    assert_eq!(history[1].realized_pnl, dec!(10));
}

#[test]
fn test_weighted_average_entry_price() {
    let (mut engine, prices) = engine(dec!(0.001));
    prices.set_price("ETHUSDT", dec!(100));
    market(&mut engine, "ETHUSDT", Side::Buy, dec!(1.0));
    prices.set_price("ETHUSDT", dec!(120));
    market(&mut engine, "ETHUSDT", Side::Buy, dec!(1.0));

    let position = engine.position("ETHUSDT").unwrap();
    assert_eq!(position.quantity, dec!(2.0));
    assert_eq!(position.entry_price, dec!(110));
}

#[test]
fn test_win_loss_counting() {
    let (mut engine, prices) = engine(dec!(0));
    prices.set_price("BTCUSDT", dec!(100));
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(3));

    prices.set_price("BTCUSDT", dec!(105));
    market(&mut engine, "BTCUSDT", Side::Sell, dec!(1));
    let summary = engine.get_account_summary().unwrap();
    assert_eq!((summary.winning_trades, summary.losing_trades), (1, 0));

    prices.set_price("BTCUSDT", dec!(95));
    market(&mut engine, "BTCUSDT", Side::Sell, dec!(1));
    let summary = engine.get_account_summary().unwrap();
    assert_eq!((summary.winning_trades, summary.losing_trades), (1, 1));

    // Adding to the position is not a win or a loss
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(1));
    let summary = engine.get_account_summary().unwrap();
    assert_eq!((summary.winning_trades, summary.losing_trades), (1, 1));
    assert_eq!(summary.total_trades, 4);
    assert_eq!(summary.win_rate, dec!(0.25));
}

#[test]
fn test_summary_is_idempotent() {
    let (mut engine, prices) = engine(dec!(0.001));
    prices.set_price("BTCUSDT", dec!(50000));
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(0.1));
    engine.place_order(OrderRequest::limit(
        "BTCUSDT",
        Side::Buy,
        dec!(0.1),
        dec!(45000),
    ));
    prices.set_price("BTCUSDT", dec!(52000));

    let first = engine.get_account_summary().unwrap();
    let second = engine.get_account_summary().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.open_orders.len(), 1);
    assert_eq!(first.positions["BTCUSDT"].unrealized_pnl, dec!(200));
}

#[test]
fn test_cancel_resolved_orders_is_noop() {
    let (mut engine, prices) = engine(dec!(0.001));
    prices.set_price("ETHUSDT", dec!(3000));

    let filled = engine.place_order(OrderRequest::market("ETHUSDT", Side::Buy, dec!(1)));
    assert!(!engine.cancel_order(&filled.id));
    assert_eq!(engine.order(&filled.id), Some(&filled));

    let resting = engine.place_order(OrderRequest::limit(
        "ETHUSDT",
        Side::Sell,
        dec!(1),
        dec!(3500),
    ));
    assert!(engine.cancel_order(&resting.id));
    let cancelled = engine.order(&resting.id).cloned().unwrap();
    assert!(!engine.cancel_order(&resting.id));
    assert_eq!(engine.order(&resting.id), Some(&cancelled));

    // Cancelled orders are never re-evaluated
    prices.set_price("ETHUSDT", dec!(3600));
    assert!(engine.evaluate_pending().is_empty());
}

#[test]
fn test_drawdown_keeps_worst_value() {
    let (mut engine, prices) = engine(dec!(0));
    prices.set_price("BTCUSDT", dec!(1000));

    // Cash 9000, nothing unrealized
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(1));
    assert_eq!(engine.account().ledger.equity, dec!(9000));

    // Cash back to 9500
    market(&mut engine, "BTCUSDT", Side::Sell, dec!(0.5));
    let summary = engine.get_account_summary().unwrap();
    assert_eq!(summary.equity, dec!(9500));
    assert_eq!(summary.max_drawdown, dec!(0.10));
    assert_eq!(summary.return_pct, dec!(-0.05));
}

#[test]
fn test_buy_may_overdraw_cash() {
    let (mut engine, prices) = engine(dec!(0));
    prices.set_price("BTCUSDT", dec!(50000));
    market(&mut engine, "BTCUSDT", Side::Buy, dec!(1));
    assert_eq!(engine.account().ledger.balance, dec!(-40000));
}
