//! paper-ledger: simulated order execution and position accounting
//!
//! This library provides the core components for:
//! - Order placement with market, limit and stop semantics
//! - Per-symbol position netting with weighted-average cost
//! - Realized/unrealized P&L, equity and drawdown tracking
//! - Injectable price sources
//! - A single-writer async handle for sharing one engine
//! - Append-only JSONL trade log
//! - Logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod data;
pub mod execution;
pub mod feed;
pub mod telemetry;
