//! Price source module
//!
//! Supplies the current price for a symbol to the paper engine

mod cached;
mod manual;

pub use cached::CachedPriceSource;
pub use manual::ManualPriceSource;

use rust_decimal::Decimal;

/// Trait for price source implementations.
///
/// Implementations never fail: unknown symbols resolve to a fallback price.
pub trait PriceSource: Send + Sync {
    /// Current price for `symbol`
    fn get_price(&self, symbol: &str) -> Decimal;
}
