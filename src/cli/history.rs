//! History command implementation

use crate::config::Config;
use crate::data::read_records;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of records to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Trade log to read, defaults to the configured one
    #[arg(long)]
    pub log: Option<PathBuf>,
}

impl HistoryArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let Some(path) = self.log.as_ref().or(config.engine.trade_log.as_ref()) else {
            anyhow::bail!("No trade log configured; pass --log");
        };

        let records = read_records(path)?;
        let start = records.len().saturating_sub(self.limit);
        for record in &records[start..] {
            println!(
                "{} {} {:<6} {:<4} {:<8} {} {} -> {}",
                record.timestamp.to_rfc3339(),
                record.order_id,
                record.order_type,
                record.side,
                record.symbol,
                record.quantity,
                record
                    .filled_price
                    .or(record.price)
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                record.status,
            );
        }
        Ok(())
    }
}
