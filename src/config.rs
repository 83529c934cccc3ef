//! Configuration types for paper-ledger

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub prices: PriceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Paper engine configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Starting cash balance
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,

    /// Commission as a fraction of notional (0.001 = 0.1%)
    #[serde(default = "default_commission_rate")]
    pub commission_rate: Decimal,

    /// Append-only JSONL trade log, disabled when absent
    #[serde(default)]
    pub trade_log: Option<PathBuf>,
}

fn default_initial_balance() -> Decimal {
    Decimal::new(10_000, 0)
}
fn default_commission_rate() -> Decimal {
    Decimal::new(1, 3) // 0.001 = 0.1%
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
            commission_rate: default_commission_rate(),
            trade_log: None,
        }
    }
}

/// Simulated price source configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PriceConfig {
    /// Baseline price per symbol
    #[serde(default = "default_baselines")]
    pub baselines: HashMap<String, Decimal>,

    /// Baseline for symbols missing from the table
    #[serde(default = "default_fallback")]
    pub fallback: Decimal,

    /// Maximum one-off perturbation in basis points (200 = ±2%)
    #[serde(default = "default_max_variation_bps")]
    pub max_variation_bps: u32,

    /// Fixed RNG seed for reproducible prices
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_baselines() -> HashMap<String, Decimal> {
    HashMap::from([
        ("BTCUSDT".to_string(), Decimal::new(50_000, 0)),
        ("ETHUSDT".to_string(), Decimal::new(3_000, 0)),
        ("ADAUSDT".to_string(), Decimal::new(5, 1)),
        ("DOTUSDT".to_string(), Decimal::new(20, 0)),
    ])
}
fn default_fallback() -> Decimal {
    Decimal::new(100, 0)
}
/// A variation of 100% or more could sample a zero or negative price
pub const MAX_VARIATION_BPS: u32 = 10_000;

fn default_max_variation_bps() -> u32 {
    200
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            baselines: default_baselines(),
            fallback: default_fallback(),
            max_variation_bps: default_max_variation_bps(),
            seed: None,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormatConfig,
    /// Prometheus exporter port, exporter disabled when absent
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

/// Log output format as written in the config file
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatConfig {
    #[default]
    Pretty,
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormatConfig::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot price or account with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine.initial_balance <= Decimal::ZERO {
            anyhow::bail!(
                "engine.initial_balance must be positive, got {}",
                self.engine.initial_balance
            );
        }
        if self.engine.commission_rate < Decimal::ZERO {
            anyhow::bail!(
                "engine.commission_rate must not be negative, got {}",
                self.engine.commission_rate
            );
        }
        self.prices.validate()
    }
}

impl PriceConfig {
    /// Every sampled price must stay strictly positive
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fallback <= Decimal::ZERO {
            anyhow::bail!("prices.fallback must be positive, got {}", self.fallback);
        }
        if let Some((symbol, price)) = self.baselines.iter().find(|(_, p)| **p <= Decimal::ZERO) {
            anyhow::bail!("prices.baselines.{} must be positive, got {}", symbol, price);
        }
        if self.max_variation_bps >= MAX_VARIATION_BPS {
            anyhow::bail!(
                "prices.max_variation_bps must be below {}, got {}",
                MAX_VARIATION_BPS,
                self.max_variation_bps
            );
        }
        Ok(())
    }
}
