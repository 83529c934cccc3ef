//! Account state, equity and drawdown bookkeeping

use super::{EngineError, Order, PositionBook, Side, TradeRecord};
use crate::feed::PriceSource;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cash, positions and counters that a fill mutates.
///
/// Fills are applied to a copy of the ledger and swapped in only once every
/// step has succeeded, so a failed fill leaves the account untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    /// Cash balance
    pub balance: Decimal,
    /// Balance plus unrealized P&L, as of the last revaluation
    pub equity: Decimal,
    /// Margin in use, not modelled
    pub margin_used: Decimal,
    /// Margin available, fixed at the initial balance
    pub free_margin: Decimal,
    /// Open positions
    pub positions: PositionBook,
    /// Number of fills
    pub total_trades: u64,
    /// Closing fills with positive realized P&L
    pub winning_trades: u64,
    /// Closing fills with zero or negative realized P&L
    pub losing_trades: u64,
    /// Cumulative realized P&L
    pub total_pnl: Decimal,
    /// Largest drawdown below the initial balance seen so far
    pub max_drawdown: Decimal,
}

impl Ledger {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            balance: initial_balance,
            equity: initial_balance,
            margin_used: dec!(0),
            free_margin: initial_balance,
            positions: PositionBook::new(),
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            total_pnl: dec!(0),
            max_drawdown: dec!(0),
        }
    }

    /// Apply one fill: net the position, move cash, count the trade.
    ///
    /// Returns the realized P&L of the fill, zero when it only opened or
    /// added exposure.
    pub fn apply_fill(
        &mut self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        commission: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, EngineError> {
        let realized = self
            .positions
            .apply_fill(symbol, side, quantity, price, now)?;

        if let Some(pnl) = realized {
            self.total_pnl = self
                .total_pnl
                .checked_add(pnl)
                .ok_or(EngineError::Arithmetic("total pnl"))?;
            if pnl > Decimal::ZERO {
                self.winning_trades += 1;
            } else {
                self.losing_trades += 1;
            }
        }

        let notional = quantity
            .checked_mul(price)
            .ok_or(EngineError::Arithmetic("notional"))?;
        self.balance = match side {
            Side::Buy => notional
                .checked_add(commission)
                .and_then(|cost| self.balance.checked_sub(cost)),
            Side::Sell => notional
                .checked_sub(commission)
                .and_then(|proceeds| self.balance.checked_add(proceeds)),
        }
        .ok_or(EngineError::Arithmetic("balance"))?;

        self.total_trades += 1;
        Ok(realized.unwrap_or(Decimal::ZERO))
    }

    /// Mark every position to `prices`, recompute equity and raise the
    /// drawdown high-water mark.
    pub fn revalue(
        &mut self,
        prices: &dyn PriceSource,
        initial_balance: Decimal,
    ) -> Result<(), EngineError> {
        for position in self.positions.iter_mut() {
            position.mark(prices.get_price(&position.symbol))?;
        }

        self.equity = self
            .balance
            .checked_add(self.positions.unrealized_pnl()?)
            .ok_or(EngineError::Arithmetic("equity"))?;

        if self.equity < initial_balance && !initial_balance.is_zero() {
            let drawdown = (initial_balance - self.equity)
                .checked_div(initial_balance)
                .ok_or(EngineError::Arithmetic("drawdown"))?;
            self.max_drawdown = self.max_drawdown.max(drawdown);
        }
        Ok(())
    }
}

/// The aggregate root: ledger, order list and trade history
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub initial_balance: Decimal,
    pub ledger: Ledger,
    /// Every accepted order, in placement order
    pub orders: Vec<Order>,
    /// One entry per fill, chronological
    pub trade_history: Vec<TradeRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(initial_balance: Decimal) -> Self {
        let now = Utc::now();
        Self {
            initial_balance,
            ledger: Ledger::new(initial_balance),
            orders: vec![],
            trade_history: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    /// Build an immutable snapshot of the current state
    pub fn summary(&self) -> Result<AccountSummary, EngineError> {
        let ledger = &self.ledger;
        let win_rate = if ledger.total_trades > 0 {
            Decimal::from(ledger.winning_trades)
                .checked_div(Decimal::from(ledger.total_trades))
                .ok_or(EngineError::Arithmetic("win rate"))?
        } else {
            dec!(0)
        };
        let return_pct = if self.initial_balance.is_zero() {
            dec!(0)
        } else {
            (ledger.equity - self.initial_balance)
                .checked_div(self.initial_balance)
                .ok_or(EngineError::Arithmetic("return"))?
        };

        let positions = ledger
            .positions
            .iter()
            .map(|p| {
                let snapshot = PositionSnapshot {
                    side: p.side,
                    quantity: p.quantity,
                    entry_price: p.entry_price,
                    current_price: p.current_price,
                    unrealized_pnl: p.unrealized_pnl,
                    realized_pnl: p.realized_pnl,
                };
                (p.symbol.clone(), snapshot)
            })
            .collect();

        Ok(AccountSummary {
            balance: ledger.balance,
            equity: ledger.equity,
            margin_used: ledger.margin_used,
            free_margin: ledger.free_margin,
            total_trades: ledger.total_trades,
            winning_trades: ledger.winning_trades,
            losing_trades: ledger.losing_trades,
            win_rate,
            total_pnl: ledger.total_pnl,
            max_drawdown: ledger.max_drawdown,
            return_pct,
            positions,
            open_orders: self.orders.iter().filter(|o| o.is_pending()).cloned().collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Position fields exposed in the account summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub side: Side,
    pub quantity: Decimal,
    pub entry_price: Decimal,
    pub current_price: Decimal,
    pub unrealized_pnl: Decimal,
    pub realized_pnl: Decimal,
}

/// Point-in-time view of the account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub balance: Decimal,
    pub equity: Decimal,
    pub margin_used: Decimal,
    pub free_margin: Decimal,
    pub total_trades: u64,
    pub winning_trades: u64,
    pub losing_trades: u64,
    /// Winning trades over total fills
    pub win_rate: Decimal,
    pub total_pnl: Decimal,
    pub max_drawdown: Decimal,
    /// (equity - initial) / initial
    pub return_pct: Decimal,
    pub positions: BTreeMap<String, PositionSnapshot>,
    pub open_orders: Vec<Order>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AccountSummary {
    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut out = format!(
            r#"
══════════════════════════════════════════════════════
               PAPER ACCOUNT SUMMARY
══════════════════════════════════════════════════════

BALANCE
───────────────────────────────────────────────────────
Balance:          {:.2}
Equity:           {:.2}
Total P&L:        {:+.2}
Return:           {:+.2}%
Max Drawdown:     {:.2}%

ACTIVITY
───────────────────────────────────────────────────────
Total Trades:     {}
Wins / Losses:    {} / {}
Win Rate:         {:.1}%
Open Orders:      {}
"#,
            self.balance,
            self.equity,
            self.total_pnl,
            self.return_pct * dec!(100),
            self.max_drawdown * dec!(100),
            self.total_trades,
            self.winning_trades,
            self.losing_trades,
            self.win_rate * dec!(100),
            self.open_orders.len(),
        );

        if !self.positions.is_empty() {
            out.push_str("\nPOSITIONS\n───────────────────────────────────────────────────────\n");
            for (symbol, p) in &self.positions {
                out.push_str(&format!(
                    "{:<10} {:<4} {} @ {:.2}  (uPnL {:+.2})\n",
                    symbol, p.side, p.quantity, p.entry_price, p.unrealized_pnl
                ));
            }
        }
        out.push_str("══════════════════════════════════════════════════════\n");
        out
    }
}
