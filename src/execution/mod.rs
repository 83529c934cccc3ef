//! Execution engine module
//!
//! Simulated order execution, position netting and account bookkeeping

mod account;
mod error;
mod handle;
mod paper;
mod position;
mod types;

pub use account::{Account, AccountSummary, Ledger, PositionSnapshot};
pub use error::{EngineError, OrderError};
pub use handle::EngineHandle;
pub use paper::PaperEngine;
pub use position::{Position, PositionBook};
pub use types::{Order, OrderId, OrderRequest, OrderStatus, OrderType, Side, TradeRecord};

use async_trait::async_trait;

/// Trait for execution engine implementations shared between tasks
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
    /// Place an order; the returned order's status carries the outcome
    async fn place_order(&self, request: OrderRequest) -> anyhow::Result<Order>;
    /// Cancel a pending order
    async fn cancel_order(&self, id: OrderId) -> anyhow::Result<bool>;
    /// Fill pending orders that now cross
    async fn evaluate_pending(&self) -> anyhow::Result<Vec<Order>>;
    /// Snapshot of the account
    async fn account_summary(&self) -> anyhow::Result<AccountSummary>;
    /// The most recent fills, oldest first
    async fn trade_history(&self, limit: usize) -> anyhow::Result<Vec<TradeRecord>>;
}
