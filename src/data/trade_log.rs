//! Append-only JSONL trade log

use crate::execution::{Order, OrderStatus, OrderType, Side};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// One line of the trade log, written per order outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLogRecord {
    pub timestamp: DateTime<Utc>,
    pub order_id: String,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub filled_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub filled_quantity: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float")]
    pub commission: Decimal,
    pub notes: String,
}

impl From<&Order> for TradeLogRecord {
    fn from(order: &Order) -> Self {
        Self {
            timestamp: order.created_at,
            order_id: order.id.to_string(),
            symbol: order.symbol.clone(),
            side: order.side,
            order_type: order.order_type,
            quantity: order.quantity,
            price: order.price,
            status: order.status,
            filled_price: order.filled_price,
            filled_quantity: order.filled_quantity,
            commission: order.commission,
            notes: order.note.clone(),
        }
    }
}

/// Trade log statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TradeLogStats {
    pub records_written: u64,
    pub write_failures: u64,
}

/// Best-effort writer for the trade log.
///
/// Every append opens the file, writes one line and flushes before
/// returning. Failures are logged and counted, never propagated.
#[derive(Debug, Default)]
pub struct TradeLog {
    path: Option<PathBuf>,
    stats: TradeLogStats,
}

impl TradeLog {
    /// Writer appending to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            stats: TradeLogStats::default(),
        }
    }

    /// Writer that records nothing
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn stats(&self) -> &TradeLogStats {
        &self.stats
    }

    /// Append the outcome of `order`
    pub fn append(&mut self, order: &Order) {
        let Some(path) = self.path.as_deref() else {
            return;
        };

        match write_record(path, &TradeLogRecord::from(order)) {
            Ok(()) => self.stats.records_written += 1,
            Err(e) => {
                self.stats.write_failures += 1;
                tracing::warn!(error = %e, path = ?path, order_id = %order.id, "Failed to write trade log");
            }
        }
    }
}

fn write_record(path: &Path, record: &TradeLogRecord) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut line = serde_json::to_string(record)?;
    line.push('\n');

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.flush()?;
    Ok(())
}

/// Read every record of a trade log file
pub fn read_records(path: impl AsRef<Path>) -> anyhow::Result<Vec<TradeLogRecord>> {
    let file = fs::File::open(path)?;
    let mut records = vec![];
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}
