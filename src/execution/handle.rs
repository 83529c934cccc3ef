//! Single-writer front for a shared paper engine

use super::{
    AccountSummary, EngineError, ExecutionEngine, Order, OrderId, OrderRequest, PaperEngine,
    TradeRecord,
};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Commands processed by the engine task, one at a time
enum Command {
    PlaceOrder(OrderRequest, oneshot::Sender<Order>),
    CancelOrder(OrderId, oneshot::Sender<bool>),
    EvaluatePending(oneshot::Sender<Vec<Order>>),
    AccountSummary(oneshot::Sender<Result<AccountSummary, EngineError>>),
    TradeHistory(usize, oneshot::Sender<Vec<TradeRecord>>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a [`PaperEngine`] owned by a single task.
///
/// Commands from every clone are applied in arrival order, giving one total
/// order over fills and trade history.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    /// Move `engine` into its own task. The join handle yields the engine
    /// back once the task shuts down.
    pub fn spawn(mut engine: PaperEngine) -> (Self, JoinHandle<PaperEngine>) {
        let (tx, mut rx) = mpsc::channel(1_024);

        let task = tokio::spawn(async move {
            engine.start();
            while let Some(command) = rx.recv().await {
                match command {
                    Command::PlaceOrder(request, reply) => {
                        let _ = reply.send(engine.place_order(request));
                    }
                    Command::CancelOrder(id, reply) => {
                        let _ = reply.send(engine.cancel_order(&id));
                    }
                    Command::EvaluatePending(reply) => {
                        let _ = reply.send(engine.evaluate_pending());
                    }
                    Command::AccountSummary(reply) => {
                        let _ = reply.send(engine.get_account_summary());
                    }
                    Command::TradeHistory(limit, reply) => {
                        let _ = reply.send(engine.get_trade_history(limit));
                    }
                    Command::Shutdown(reply) => {
                        let _ = reply.send(());
                        break;
                    }
                }
            }
            engine.stop();
            engine
        });

        (Self { tx }, task)
    }

    /// Stop the engine task after the commands queued before this one
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        self.request(Command::Shutdown).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> anyhow::Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .await
            .map_err(|_| EngineError::Closed)?;
        Ok(reply_rx.await.map_err(|_| EngineError::Closed)?)
    }
}

#[async_trait]
impl ExecutionEngine for EngineHandle {
    async fn place_order(&self, request: OrderRequest) -> anyhow::Result<Order> {
        self.request(|reply| Command::PlaceOrder(request, reply)).await
    }

    async fn cancel_order(&self, id: OrderId) -> anyhow::Result<bool> {
        self.request(|reply| Command::CancelOrder(id, reply)).await
    }

    async fn evaluate_pending(&self) -> anyhow::Result<Vec<Order>> {
        self.request(Command::EvaluatePending).await
    }

    async fn account_summary(&self) -> anyhow::Result<AccountSummary> {
        Ok(self.request(Command::AccountSummary).await??)
    }

    async fn trade_history(&self, limit: usize) -> anyhow::Result<Vec<TradeRecord>> {
        self.request(|reply| Command::TradeHistory(limit, reply))
            .await
    }
}
