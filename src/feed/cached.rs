//! Baseline-table price source with a per-symbol sample cache

use super::PriceSource;
use crate::config::{PriceConfig, MAX_VARIATION_BPS};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Mutex;

/// Samples each symbol once around its baseline price and then holds that
/// price fixed for the lifetime of the source.
pub struct CachedPriceSource {
    baselines: HashMap<String, Decimal>,
    fallback: Decimal,
    max_variation_bps: u32,
    state: Mutex<CacheState>,
}

struct CacheState {
    rng: StdRng,
    prices: HashMap<String, Decimal>,
}

impl CachedPriceSource {
    /// Source with the built-in baseline table, seeded from entropy
    pub fn new() -> Self {
        Self::from_config(&PriceConfig::default())
    }

    /// Source with a fixed seed, for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        let mut source = Self::new();
        source.reseed(seed);
        source
    }

    /// Build from configuration
    pub fn from_config(config: &PriceConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            baselines: config.baselines.clone(),
            fallback: config.fallback,
            max_variation_bps: config.max_variation_bps,
            state: Mutex::new(CacheState {
                rng,
                prices: HashMap::new(),
            }),
        }
    }

    fn reseed(&mut self, seed: u64) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        state.rng = StdRng::seed_from_u64(seed);
    }

    /// Baseline for `symbol` before perturbation
    pub fn baseline(&self, symbol: &str) -> Decimal {
        self.baselines.get(symbol).copied().unwrap_or(self.fallback)
    }

    /// Perturb the baseline, keeping it whenever the perturbed price would
    /// overflow or fail to stay positive
    fn sample(&self, symbol: &str, rng: &mut StdRng) -> Decimal {
        let baseline = self.baseline(symbol);
        let bound = i64::from(self.max_variation_bps.min(MAX_VARIATION_BPS));
        let bps = rng.gen_range(-bound..=bound);
        let factor = dec!(1) + Decimal::new(bps, 4);
        match baseline.checked_mul(factor) {
            Some(price) if price > Decimal::ZERO => price,
            _ => baseline,
        }
    }
}

impl Default for CachedPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for CachedPriceSource {
    fn get_price(&self, symbol: &str) -> Decimal {
        let mut guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(price) = guard.prices.get(symbol) {
            return *price;
        }

        let CacheState { rng, prices } = &mut *guard;
        let price = self.sample(symbol, rng);
        prices.insert(symbol.to_string(), price);
        tracing::debug!(symbol, %price, "Sampled simulated price");
        price
    }
}
