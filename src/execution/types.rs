//! Execution types

use super::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order identifier, rendered as `PAPER_######`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Build the identifier for the given sequence number
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!("PAPER_{sequence:06}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Trade side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy, or a long position
    Buy,
    /// Sell, or a short position
    Sell,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Side {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "long" => Ok(Side::Buy),
            "sell" | "short" => Ok(Side::Sell),
            _ => Err(OrderError::UnknownSide(s.to_string())),
        }
    }
}

/// Order type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Market order (immediate execution at the current price)
    Market,
    /// Limit order (fills at the limit price once crossed)
    Limit,
    /// Stop order (becomes a market order once triggered)
    Stop,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderType::Market => "market",
            OrderType::Limit => "limit",
            OrderType::Stop => "stop",
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderType {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(OrderType::Market),
            "limit" => Ok(OrderType::Limit),
            "stop" => Ok(OrderType::Stop),
            _ => Err(OrderError::UnknownOrderType(s.to_string())),
        }
    }
}

/// Order lifecycle state. Only `Pending` may transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Filled => "filled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// An order intent as submitted by a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Trading symbol (e.g., "BTCUSDT")
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Order type
    pub order_type: OrderType,
    /// Requested quantity
    pub quantity: Decimal,
    /// Limit price, required for limit orders
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Trigger price, required for stop orders
    #[serde(default)]
    pub stop_price: Option<Decimal>,
}

impl OrderRequest {
    /// Market order for the given quantity
    pub fn market(symbol: impl Into<String>, side: Side, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
            stop_price: None,
        }
    }

    /// Limit order at `price`
    pub fn limit(symbol: impl Into<String>, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            price: Some(price),
            order_type: OrderType::Limit,
            ..Self::market(symbol, side, quantity)
        }
    }

    /// Stop order triggered at `stop_price`
    pub fn stop(
        symbol: impl Into<String>,
        side: Side,
        quantity: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            stop_price: Some(stop_price),
            order_type: OrderType::Stop,
            ..Self::market(symbol, side, quantity)
        }
    }

    /// Reject malformed intents before anything is touched
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.symbol.trim().is_empty() {
            return Err(OrderError::EmptySymbol);
        }
        if self.quantity <= Decimal::ZERO {
            return Err(OrderError::NonPositiveQuantity(self.quantity));
        }
        match self.order_type {
            OrderType::Market => {}
            OrderType::Limit if self.price.is_none() => return Err(OrderError::MissingLimitPrice),
            OrderType::Stop if self.stop_price.is_none() => {
                return Err(OrderError::MissingStopPrice)
            }
            OrderType::Limit | OrderType::Stop => {}
        }
        for price in [self.price, self.stop_price].into_iter().flatten() {
            if price <= Decimal::ZERO {
                return Err(OrderError::NonPositivePrice(price));
            }
        }
        Ok(())
    }
}

/// A placed order and its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub id: OrderId,
    /// Trading symbol
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Order type
    pub order_type: OrderType,
    /// Requested quantity
    pub quantity: Decimal,
    /// Reference price: current price for market orders, limit price for
    /// limit orders, trigger price for stop orders
    pub price: Option<Decimal>,
    /// Stop trigger price
    pub stop_price: Option<Decimal>,
    /// Lifecycle state
    pub status: OrderStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Fill timestamp
    pub filled_at: Option<DateTime<Utc>>,
    /// Execution price
    pub filled_price: Option<Decimal>,
    /// Executed quantity
    pub filled_quantity: Option<Decimal>,
    /// Commission charged
    pub commission: Decimal,
    /// Free text, carries the rejection reason
    pub note: String,
}

impl Order {
    /// New pending order from a request
    pub fn new(id: OrderId, request: &OrderRequest, reference_price: Option<Decimal>) -> Self {
        Self {
            id,
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            quantity: request.quantity,
            price: reference_price,
            stop_price: request.stop_price,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            filled_at: None,
            filled_price: None,
            filled_quantity: None,
            commission: Decimal::ZERO,
            note: String::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Price at which the order executes now, or `None` if it does not cross
    pub fn crossing_price(&self, current_price: Decimal) -> Option<Decimal> {
        match (self.order_type, self.side) {
            (OrderType::Market, _) => Some(current_price),
            (OrderType::Limit, side) => {
                let limit = self.price?;
                let crosses = match side {
                    Side::Buy => current_price <= limit,
                    Side::Sell => current_price >= limit,
                };
                crosses.then_some(limit)
            }
            (OrderType::Stop, side) => {
                let trigger = self.stop_price?;
                let triggered = match side {
                    Side::Buy => current_price >= trigger,
                    Side::Sell => current_price <= trigger,
                };
                triggered.then_some(current_price)
            }
        }
    }
}

/// One entry in the account's trade history, written per fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Order that produced the fill
    pub order_id: OrderId,
    /// Trading symbol
    pub symbol: String,
    /// Trade side
    pub side: Side,
    /// Fill quantity
    pub quantity: Decimal,
    /// Fill price
    pub price: Decimal,
    /// Commission paid
    pub commission: Decimal,
    /// Realized P&L on the closed leg, zero for opening fills
    pub realized_pnl: Decimal,
    /// Fill timestamp
    pub timestamp: DateTime<Utc>,
}
