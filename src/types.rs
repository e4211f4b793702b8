// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Type Definitions

use serde::{Serialize, Deserialize};

// ─── SimulationParams ────────────────────────────────────────────────────────

/// Configuration for one simulation run. Read-only for the duration of the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationParams {
    /// Re-seeds the random source; only the low 32 bits are used.
    pub seed: i64,
    pub start_ts_ms: i64,
    pub dt_ms: i64,

    // price process
    pub start_price: f64,
    pub mean_price: f64,
    pub mean_reversion_theta: f64,
    pub volatility_sigma: f64,
    /// Poisson jump intensity per second.
    pub jump_lambda_per_sec: f64,
    /// Jump size std (log-return).
    pub jump_std: f64,

    // volume model
    pub base_volume: f64,
    pub volume_vol: f64,

    // candle config
    pub candle_ms: i64,
    pub ticks: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            start_ts_ms: 0,
            dt_ms: 1_000,
            start_price: 100.0,
            mean_price: 100.0,
            mean_reversion_theta: 0.5,
            volatility_sigma: 0.02,
            jump_lambda_per_sec: 0.001,
            jump_std: 0.03,
            base_volume: 10.0,
            volume_vol: 0.3,
            candle_ms: 60_000,
            ticks: 3_600,
        }
    }
}

impl SimulationParams {
    /// Tick spacing in seconds.
    pub fn dt_sec(&self) -> f64 {
        self.dt_ms as f64 / 1000.0
    }

    /// Number of ticks that fall into one full candle.
    pub fn ticks_per_candle(&self) -> i64 {
        if self.dt_ms > 0 { self.candle_ms / self.dt_ms } else { 0 }
    }
}

// ─── Tick ────────────────────────────────────────────────────────────────────

/// One simulated observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub ts_ms: i64,
    pub price: f64,
    pub volume: f64,
}

// ─── Candle ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candle {
    /// Aligned bucket start.
    pub ts_ms: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Start a candle from the first tick of a bucket.
    pub fn open_at(ts_ms: i64, tick: &Tick) -> Self {
        Self {
            ts_ms,
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: tick.volume,
        }
    }

    /// Fold a later tick of the same bucket into this candle.
    pub fn absorb(&mut self, tick: &Tick) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume += tick.volume;
    }

    /// `low <= open, close <= high` and non-negative volume.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open
            && self.open <= self.high
            && self.low <= self.close
            && self.close <= self.high
            && self.volume >= 0.0
    }
}

// ─── SimulationResult ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub candles: Vec<Candle>,
}

impl SimulationResult {
    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.candles.iter().map(|c| c.volume).sum()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close)
    }
}
