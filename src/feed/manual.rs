//! Caller-driven price source

use super::PriceSource;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::RwLock;

/// Prices set explicitly by the caller, changeable while an engine holds the
/// source through an `Arc`.
pub struct ManualPriceSource {
    prices: RwLock<HashMap<String, Decimal>>,
    fallback: Decimal,
}

impl ManualPriceSource {
    pub fn new() -> Self {
        Self::with_fallback(dec!(100))
    }

    /// Source returning `fallback` for symbols with no price set
    pub fn with_fallback(fallback: Decimal) -> Self {
        Self {
            prices: RwLock::new(HashMap::new()),
            fallback,
        }
    }

    /// Builder-style initial price
    pub fn with_price(self, symbol: &str, price: Decimal) -> Self {
        self.set_price(symbol, price);
        self
    }

    /// Move the price of `symbol`
    pub fn set_price(&self, symbol: &str, price: Decimal) {
        let mut prices = self.prices.write().unwrap_or_else(|e| e.into_inner());
        prices.insert(symbol.to_string(), price);
    }
}

impl Default for ManualPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for ManualPriceSource {
    fn get_price(&self, symbol: &str) -> Decimal {
        let prices = self.prices.read().unwrap_or_else(|e| e.into_inner());
        prices.get(symbol).copied().unwrap_or(self.fallback)
    }
}
