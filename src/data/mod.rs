//! Trade log module
//!
//! Persists one JSON line per order outcome for offline analysis

mod trade_log;

pub use trade_log::{read_records, TradeLog, TradeLogRecord, TradeLogStats};
