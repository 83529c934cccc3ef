//! Position tracking and netting

use super::{EngineError, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The net holding of one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Trading symbol
    pub symbol: String,
    /// Long (`Buy`) or short (`Sell`)
    pub side: Side,
    /// Open quantity, always positive
    pub quantity: Decimal,
    /// Weighted-average cost basis
    pub entry_price: Decimal,
    /// Last observed market price
    pub current_price: Decimal,
    /// Mark-to-market P&L at `current_price`
    pub unrealized_pnl: Decimal,
    /// P&L realized while this position existed
    pub realized_pnl: Decimal,
    /// Open timestamp
    pub created_at: DateTime<Utc>,
    /// Last change timestamp
    pub updated_at: DateTime<Utc>,
}

impl Position {
    fn open(symbol: &str, side: Side, quantity: Decimal, price: Decimal, now: DateTime<Utc>) -> Self {
        Self {
            symbol: symbol.to_string(),
            side,
            quantity,
            entry_price: price,
            current_price: price,
            unrealized_pnl: Decimal::ZERO,
            realized_pnl: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// P&L of `quantity` units of this position exited at `price`
    pub fn pnl_at(&self, price: Decimal, quantity: Decimal) -> Result<Decimal, EngineError> {
        let per_unit = match self.side {
            Side::Buy => price.checked_sub(self.entry_price),
            Side::Sell => self.entry_price.checked_sub(price),
        }
        .ok_or(EngineError::Arithmetic("price difference"))?;
        per_unit
            .checked_mul(quantity)
            .ok_or(EngineError::Arithmetic("position pnl"))
    }

    /// Re-mark the position at `price`
    pub fn mark(&mut self, price: Decimal) -> Result<(), EngineError> {
        self.unrealized_pnl = self.pnl_at(price, self.quantity)?;
        self.current_price = price;
        Ok(())
    }
}

/// All open positions of an account, keyed by symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionBook {
    positions: BTreeMap<String, Position>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net a fill into the book.
    ///
    /// Returns the realized P&L when the fill closed (fully or partially) an
    /// opposite position, `None` when it only opened or added exposure. A fill
    /// larger than the opposite position closes it and opens the remainder
    /// on the fill's side at the fill price.
    pub fn apply_fill(
        &mut self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Option<Decimal>, EngineError> {
        let Some(position) = self.positions.get_mut(symbol) else {
            self.positions
                .insert(symbol.to_string(), Position::open(symbol, side, quantity, price, now));
            return Ok(None);
        };

        if position.side == side {
            let total_quantity = position
                .quantity
                .checked_add(quantity)
                .ok_or(EngineError::Arithmetic("position quantity"))?;
            let total_cost = position
                .quantity
                .checked_mul(position.entry_price)
                .zip(quantity.checked_mul(price))
                .and_then(|(held, added)| held.checked_add(added))
                .ok_or(EngineError::Arithmetic("position cost"))?;
            position.entry_price = total_cost
                .checked_div(total_quantity)
                .ok_or(EngineError::Arithmetic("entry price"))?;
            position.quantity = total_quantity;
            position.updated_at = now;
            return Ok(None);
        }

        if quantity >= position.quantity {
            let closed_quantity = position.quantity;
            let realized = position.pnl_at(price, closed_quantity)?;
            self.positions.remove(symbol);

            let remainder = quantity - closed_quantity;
            if remainder > Decimal::ZERO {
                self.positions
                    .insert(symbol.to_string(), Position::open(symbol, side, remainder, price, now));
            }
            Ok(Some(realized))
        } else {
            let realized = position.pnl_at(price, quantity)?;
            position.realized_pnl = position
                .realized_pnl
                .checked_add(realized)
                .ok_or(EngineError::Arithmetic("realized pnl"))?;
            position.quantity -= quantity;
            position.updated_at = now;
            Ok(Some(realized))
        }
    }

    /// Sum of unrealized P&L over all open positions
    pub fn unrealized_pnl(&self) -> Result<Decimal, EngineError> {
        self.positions.values().try_fold(Decimal::ZERO, |acc, p| {
            acc.checked_add(p.unrealized_pnl)
                .ok_or(EngineError::Arithmetic("unrealized pnl"))
        })
    }

    pub fn get(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.positions.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Position> {
        self.positions.values_mut()
    }

    /// Number of open positions
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
