//! Replay command implementation

use crate::config::Config;
use crate::execution::{EngineHandle, ExecutionEngine, OrderRequest, PaperEngine};
use anyhow::Context;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSONL file with one order request per line
    #[arg(long)]
    pub orders: PathBuf,

    /// Re-check pending orders after each submission
    #[arg(long)]
    pub evaluate_pending: bool,
}

impl ReplayArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let requests = load_requests(&self.orders)?;
        tracing::info!(count = requests.len(), path = ?self.orders, "Replaying orders");

        let (handle, task) = EngineHandle::spawn(PaperEngine::from_config(config));
        for request in requests {
            let order = handle.place_order(request).await?;
            println!(
                "{} {} {} {} {} -> {} {}",
                order.id,
                order.order_type,
                order.side,
                order.quantity,
                order.symbol,
                order.status,
                order.note
            );

            if self.evaluate_pending {
                for filled in handle.evaluate_pending().await? {
                    println!("{} {} -> {}", filled.id, filled.symbol, filled.status);
                }
            }
        }

        let summary = handle.account_summary().await?;
        println!("{}", summary.format_table());

        handle.shutdown().await?;
        task.await?;
        Ok(())
    }
}

/// Parse a JSONL file of order requests, skipping blank lines
pub fn load_requests(path: &Path) -> anyhow::Result<Vec<OrderRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read orders from {}", path.display()))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Invalid order request on line {}", index + 1))
        })
        .collect()
}
