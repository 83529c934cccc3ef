//! Concurrent use of one engine through the single-writer handle

use paper_ledger::execution::{
    EngineHandle, ExecutionEngine, OrderRequest, OrderStatus, PaperEngine, Side,
};
use paper_ledger::feed::ManualPriceSource;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn spawn_engine() -> (EngineHandle, tokio::task::JoinHandle<PaperEngine>) {
    let prices = Arc::new(ManualPriceSource::new().with_price("BTCUSDT", dec!(100)));
    EngineHandle::spawn(PaperEngine::new(dec!(10000), dec!(0), prices))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bots_share_one_ledger() {
    let (handle, task) = spawn_engine();

    let mut bots = vec![];
    for bot in 0..8 {
        let handle = handle.clone();
        bots.push(tokio::spawn(async move {
            let side = if bot % 2 == 0 { Side::Buy } else { Side::Sell };
            for _ in 0..25 {
                let order = handle
                    .place_order(OrderRequest::market("BTCUSDT", side, dec!(1)))
                    .await
                    .unwrap();
                assert_eq!(order.status, OrderStatus::Filled);
            }
        }));
    }
    for bot in bots {
        bot.await.unwrap();
    }

    let summary = handle.account_summary().await.unwrap();
    assert_eq!(summary.total_trades, 200);
    // Equal buy and sell volume at one price nets out flat
    assert_eq!(summary.balance, dec!(10000));
    assert!(summary.positions.is_empty());

    let history = handle.trade_history(1_000).await.unwrap();
    assert_eq!(history.len(), 200);
    for pair in history.windows(2) {
        assert!(pair[0].order_id.as_str() < pair[1].order_id.as_str());
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    handle.shutdown().await.unwrap();
    let engine = task.await.unwrap();
    assert_eq!(engine.account().orders.len(), 200);
}

#[tokio::test]
async fn test_rejections_do_not_interrupt_batch() {
    let (handle, _task) = spawn_engine();

    let batch = vec![
        OrderRequest::market("BTCUSDT", Side::Buy, dec!(1)),
        OrderRequest::market("BTCUSDT", Side::Buy, dec!(0)),
        OrderRequest::market("", Side::Buy, dec!(1)),
        OrderRequest::market("BTCUSDT", Side::Sell, dec!(1)),
    ];

    let mut statuses = vec![];
    for request in batch {
        statuses.push(handle.place_order(request).await.unwrap().status);
    }

    assert_eq!(
        statuses,
        vec![
            OrderStatus::Filled,
            OrderStatus::Rejected,
            OrderStatus::Rejected,
            OrderStatus::Filled,
        ]
    );
    let summary = handle.account_summary().await.unwrap();
    assert_eq!(summary.total_trades, 2);
}
