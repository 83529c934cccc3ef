//! Execution errors

use rust_decimal::Decimal;
use thiserror::Error;

/// Malformed order intents, rejected before any state is touched
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    #[error("Limit order requires a price")]
    MissingLimitPrice,
    #[error("Stop order requires a stop price")]
    MissingStopPrice,
    #[error("Price must be positive, got {0}")]
    NonPositivePrice(Decimal),
    #[error("Symbol must not be empty")]
    EmptySymbol,
    #[error("Unknown order type: {0}")]
    UnknownOrderType(String),
    #[error("Unknown side: {0}")]
    UnknownSide(String),
}

/// Engine failures
#[derive(Debug, Error)]
pub enum EngineError {
    /// Decimal overflow while resolving a fill or revaluing the account
    #[error("Arithmetic overflow computing {0}")]
    Arithmetic(&'static str),
    /// Order failed validation
    #[error(transparent)]
    Invalid(#[from] OrderError),
    /// The engine task is no longer running
    #[error("Engine task has shut down")]
    Closed,
}
