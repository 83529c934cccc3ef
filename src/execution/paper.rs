//! Paper trading execution engine

use super::{
    Account, AccountSummary, EngineError, Order, OrderId, OrderRequest, OrderStatus, OrderType,
    Position, TradeRecord,
};
use crate::config::Config;
use crate::data::TradeLog;
use crate::feed::{CachedPriceSource, PriceSource};
use crate::telemetry::{self, GaugeMetric};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Simulated execution against a price source.
///
/// The engine is the only mutator of its [`Account`]. Every call runs to
/// completion before returning; see [`super::EngineHandle`] for sharing one
/// engine between tasks.
pub struct PaperEngine {
    commission_rate: Decimal,
    prices: Arc<dyn PriceSource>,
    account: Account,
    trade_log: TradeLog,
    order_counter: u64,
    is_running: bool,
}

impl PaperEngine {
    /// Create an engine with the trade log disabled
    pub fn new(
        initial_balance: Decimal,
        commission_rate: Decimal,
        prices: Arc<dyn PriceSource>,
    ) -> Self {
        Self {
            commission_rate,
            prices,
            account: Account::new(initial_balance),
            trade_log: TradeLog::disabled(),
            order_counter: 0,
            is_running: false,
        }
    }

    /// Create an engine with simulated prices and the configured trade log
    pub fn from_config(config: &Config) -> Self {
        let prices = Arc::new(CachedPriceSource::from_config(&config.prices));
        let engine = Self::new(
            config.engine.initial_balance,
            config.engine.commission_rate,
            prices,
        );
        match &config.engine.trade_log {
            Some(path) => engine.with_trade_log(TradeLog::new(path)),
            None => engine,
        }
    }

    /// Replace the trade log writer
    pub fn with_trade_log(mut self, trade_log: TradeLog) -> Self {
        self.trade_log = trade_log;
        self
    }

    pub fn start(&mut self) {
        self.is_running = true;
        tracing::info!("Paper trading engine started");
    }

    pub fn stop(&mut self) {
        self.is_running = false;
        tracing::info!("Paper trading engine stopped");
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Place an order and resolve it against the current price.
    ///
    /// Never fails: invalid intents and failed fills come back `Rejected`
    /// with the reason in `note`, and leave the account untouched. Orders
    /// that do not cross stay `Pending`.
    pub fn place_order(&mut self, request: OrderRequest) -> Order {
        let id = self.next_order_id();

        if let Err(e) = request.validate() {
            let mut order = Order::new(id, &request, request.price.or(request.stop_price));
            reject(&mut order, &EngineError::from(e));
            self.record(&order);
            return order;
        }

        let current_price = self.prices.get_price(&request.symbol);
        let reference_price = match request.order_type {
            OrderType::Market => Some(current_price),
            OrderType::Limit => request.price,
            OrderType::Stop => request.stop_price,
        };
        let mut order = Order::new(id, &request, reference_price);

        match order.crossing_price(current_price) {
            Some(fill_price) => {
                if let Err(e) = self.fill(&mut order, fill_price) {
                    reject(&mut order, &e);
                }
            }
            None => {
                tracing::info!(
                    order_id = %order.id,
                    symbol = %order.symbol,
                    side = %order.side,
                    order_type = %order.order_type,
                    %current_price,
                    "Order resting"
                );
            }
        }

        self.record(&order);
        order
    }

    /// Cancel a pending order. Returns false for unknown or resolved orders.
    pub fn cancel_order(&mut self, id: &OrderId) -> bool {
        let Some(order) = self
            .account
            .orders
            .iter_mut()
            .find(|o| &o.id == id && o.is_pending())
        else {
            return false;
        };

        order.status = OrderStatus::Cancelled;
        self.account.updated_at = Utc::now();
        tracing::info!(order_id = %id, "Order cancelled");

        let order = order.clone();
        self.trade_log.append(&order);
        telemetry::record_order(order.status);
        true
    }

    /// Re-check every pending order against current prices and fill those
    /// that now cross. Returns the orders filled by this pass.
    pub fn evaluate_pending(&mut self) -> Vec<Order> {
        let mut filled = vec![];

        for index in 0..self.account.orders.len() {
            if !self.account.orders[index].is_pending() {
                continue;
            }
            let mut order = self.account.orders[index].clone();
            let current_price = self.prices.get_price(&order.symbol);
            let Some(fill_price) = order.crossing_price(current_price) else {
                continue;
            };

            if let Err(e) = self.fill(&mut order, fill_price) {
                reject(&mut order, &e);
            }
            self.trade_log.append(&order);
            telemetry::record_order(order.status);
            if order.status == OrderStatus::Filled {
                filled.push(order.clone());
            }
            self.account.orders[index] = order;
        }

        filled
    }

    /// Revalue the account and return a snapshot of it
    pub fn get_account_summary(&mut self) -> Result<AccountSummary, EngineError> {
        let mut staged = self.account.ledger.clone();
        staged.revalue(self.prices.as_ref(), self.account.initial_balance)?;
        self.account.ledger = staged;
        self.publish_metrics();
        self.account.summary()
    }

    /// The most recent `limit` fills, oldest first
    pub fn get_trade_history(&self, limit: usize) -> Vec<TradeRecord> {
        let history = &self.account.trade_history;
        history[history.len().saturating_sub(limit)..].to_vec()
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.account.orders.iter().find(|o| &o.id == id)
    }

    /// Orders still waiting to cross
    pub fn open_orders(&self) -> Vec<&Order> {
        self.account.orders.iter().filter(|o| o.is_pending()).collect()
    }

    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.account.ledger.positions.get(symbol)
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn trade_log(&self) -> &TradeLog {
        &self.trade_log
    }

    fn next_order_id(&mut self) -> OrderId {
        self.order_counter += 1;
        OrderId::from_sequence(self.order_counter)
    }

    /// Execute `order` in full at `fill_price`.
    ///
    /// All ledger changes are made on a copy and committed together, so an
    /// error leaves both the account and the order as they were.
    fn fill(&mut self, order: &mut Order, fill_price: Decimal) -> Result<(), EngineError> {
        let commission = order
            .quantity
            .checked_mul(fill_price)
            .and_then(|notional| notional.checked_mul(self.commission_rate))
            .ok_or(EngineError::Arithmetic("commission"))?;
        let now = Utc::now();

        let mut staged = self.account.ledger.clone();
        let realized_pnl = staged.apply_fill(
            &order.symbol,
            order.side,
            order.quantity,
            fill_price,
            commission,
            now,
        )?;
        staged.revalue(self.prices.as_ref(), self.account.initial_balance)?;

        self.account.ledger = staged;
        self.account.updated_at = now;

        order.status = OrderStatus::Filled;
        order.filled_at = Some(now);
        order.filled_price = Some(fill_price);
        order.filled_quantity = Some(order.quantity);
        order.commission = commission;

        self.account.trade_history.push(TradeRecord {
            order_id: order.id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            quantity: order.quantity,
            price: fill_price,
            commission,
            realized_pnl,
            timestamp: now,
        });

        tracing::info!(
            order_id = %order.id,
            symbol = %order.symbol,
            side = %order.side,
            quantity = %order.quantity,
            price = %fill_price,
            %commission,
            %realized_pnl,
            "Order filled"
        );
        self.publish_metrics();
        Ok(())
    }

    /// Log a placement outcome. Rejected orders are returned and logged but
    /// never enter the account.
    fn record(&mut self, order: &Order) {
        if order.status != OrderStatus::Rejected {
            self.account.orders.push(order.clone());
        }
        self.trade_log.append(order);
        telemetry::record_order(order.status);
    }

    fn publish_metrics(&self) {
        let ledger = &self.account.ledger;
        let gauges = [
            (GaugeMetric::Equity, ledger.equity),
            (GaugeMetric::Balance, ledger.balance),
            (GaugeMetric::RealizedPnl, ledger.total_pnl),
            (GaugeMetric::DrawdownPct, ledger.max_drawdown),
            (GaugeMetric::OpenPositions, Decimal::from(ledger.positions.len())),
        ];
        for (metric, value) in gauges {
            telemetry::set_gauge(metric, value.to_f64().unwrap_or_default());
        }
    }
}

fn reject(order: &mut Order, error: &EngineError) {
    order.status = OrderStatus::Rejected;
    order.note = error.to_string();
    tracing::warn!(order_id = %order.id, symbol = %order.symbol, error = %error, "Order rejected");
}
