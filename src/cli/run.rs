//! Run command implementation

use crate::config::Config;
use crate::execution::{OrderRequest, PaperEngine, Side};
use clap::Args;
use rust_decimal_macros::dec;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Number of recent trades to print
    #[arg(long, default_value = "5")]
    pub history: usize,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let mut engine = PaperEngine::from_config(config);
        engine.start();

        let session = [
            OrderRequest::market("BTCUSDT", Side::Buy, dec!(0.1)),
            OrderRequest::market("BTCUSDT", Side::Sell, dec!(0.05)),
            OrderRequest::limit("ETHUSDT", Side::Buy, dec!(1.0), dec!(2900)),
        ];
        for request in session {
            let order = engine.place_order(request);
            println!(
                "{} {} {} {} {} -> {}",
                order.id, order.order_type, order.side, order.quantity, order.symbol, order.status
            );
        }

        let summary = engine.get_account_summary()?;
        println!("{}", summary.format_table());

        for trade in engine.get_trade_history(self.history) {
            println!(
                "  {} {} {} @ {:.2}",
                trade.side, trade.quantity, trade.symbol, trade.price
            );
        }

        engine.stop();
        if let Some(path) = engine.trade_log().path() {
            println!(
                "Trade log: {} ({} records)",
                path.display(),
                engine.trade_log().stats().records_written
            );
        }
        Ok(())
    }
}
