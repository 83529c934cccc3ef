//! Account and order metrics

use crate::execution::OrderStatus;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current equity
    Equity,
    /// Cash balance
    Balance,
    /// Cumulative realized P&L
    RealizedPnl,
    /// Open position count
    OpenPositions,
    /// Maximum drawdown fraction
    DrawdownPct,
}

impl GaugeMetric {
    pub fn name(self) -> &'static str {
        match self {
            GaugeMetric::Equity => "paper_ledger_equity",
            GaugeMetric::Balance => "paper_ledger_balance",
            GaugeMetric::RealizedPnl => "paper_ledger_realized_pnl",
            GaugeMetric::OpenPositions => "paper_ledger_open_positions",
            GaugeMetric::DrawdownPct => "paper_ledger_max_drawdown",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    ::metrics::gauge!(metric.name()).set(value);
}

/// Count an order outcome by its status
pub fn record_order(status: OrderStatus) {
    ::metrics::counter!("paper_ledger_orders_total", "status" => status.as_str()).increment(1);
}
