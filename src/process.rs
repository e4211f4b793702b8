// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Process Simulator

//! Mean-reverting jump diffusion in log-price space.
//!
//! ```text
//! dX = theta * (ln(mean) - X) dt + sigma dW + J,   price = e^X
//! ```
//!
//! Jumps arrive as a Bernoulli trial with `p = lambda * dt` per step, which
//! approximates a Poisson arrival only while `lambda * dt` is small.

use crate::error::SimError;
use crate::rng::XorShift32;
use crate::types::{SimulationParams, Tick};
use crate::validation::validate;

/// Weight of |log-return| in the volume activity multiplier.
const VOLUME_MOVE_GAIN: f64 = 10.0;

/// Per-step coefficients derived once from the parameters.
#[derive(Debug, Clone)]
struct StepModel {
    dt_sec: f64,
    sqrt_dt: f64,
    log_mean: f64,
    theta: f64,
    sigma: f64,
    jump_prob: f64,
    jump_std: f64,
    base_volume: f64,
    volume_vol: f64,
}

/// Increment of one step, split by source.
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepMove {
    mean_revert: f64,
    diffusion: f64,
    jump: f64,
}

impl StepMove {
    fn total(&self) -> f64 {
        self.mean_revert + self.diffusion + self.jump
    }
}

impl StepModel {
    fn new(p: &SimulationParams) -> Self {
        let dt_sec = p.dt_sec();
        Self {
            dt_sec,
            sqrt_dt: dt_sec.sqrt(),
            log_mean: p.mean_price.ln(),
            theta: p.mean_reversion_theta,
            sigma: p.volatility_sigma,
            jump_prob: p.jump_lambda_per_sec * dt_sec,
            jump_std: p.jump_std,
            base_volume: p.base_volume,
            volume_vol: p.volume_vol,
        }
    }

    /// Draw order is fixed: diffusion normal, jump uniform, jump normal (only
    /// when the jump fires). Changing it changes every seeded stream.
    fn log_move(&self, log_p: f64, rng: &mut XorShift32) -> StepMove {
        let dw = self.sqrt_dt * rng.next_normal();
        let mean_revert = self.theta * (self.log_mean - log_p) * self.dt_sec;
        let diffusion = self.sigma * dw;
        let jump = if rng.next_f64() < self.jump_prob {
            rng.next_normal() * self.jump_std
        } else {
            0.0
        };
        StepMove { mean_revert, diffusion, jump }
    }

    fn volume(&self, step: &StepMove, rng: &mut XorShift32) -> f64 {
        let activity = 1.0 + VOLUME_MOVE_GAIN * step.total().abs();
        let noise = (1.0 + rng.next_normal() * self.volume_vol).max(0.0);
        self.base_volume * activity * noise
    }
}

/// Streaming tick generator for one run.
///
/// Owns its random source and the log-price accumulator; each item depends on
/// the previous one, so the stream is strictly sequential. After an error the
/// stream is fused and yields `None`.
#[derive(Debug, Clone)]
pub struct TickStream {
    model: StepModel,
    rng: XorShift32,
    log_p: f64,
    dt_ms: i64,
    next_ts: Option<i64>,
    index: u64,
    total: u64,
}

impl TickStream {
    /// Validate `params` and build the stream. No random draws happen here.
    pub fn new(params: &SimulationParams) -> Result<Self, SimError> {
        validate(params)?;
        Ok(Self {
            model: StepModel::new(params),
            rng: XorShift32::from_seed(params.seed),
            log_p: params.start_price.ln(),
            dt_ms: params.dt_ms,
            next_ts: Some(params.start_ts_ms),
            index: 0,
            total: params.ticks,
        })
    }

    /// Ticks emitted so far.
    pub fn emitted(&self) -> u64 {
        self.index
    }

    /// Current log-price state.
    pub fn log_price(&self) -> f64 {
        self.log_p
    }

    fn fuse(&mut self) {
        self.total = self.index;
    }

    fn step(&mut self) -> Result<Tick, SimError> {
        let ts_ms = self
            .next_ts
            .ok_or(SimError::TimestampOverflow { index: self.index })?;

        let step = self.model.log_move(self.log_p, &mut self.rng);
        self.log_p += step.total();
        let price = self.log_p.exp();
        let volume = self.model.volume(&step, &mut self.rng);

        if !(price.is_finite() && price > 0.0 && volume.is_finite()) {
            return Err(SimError::OutOfRange { index: self.index, ts_ms });
        }

        self.next_ts = ts_ms.checked_add(self.dt_ms);
        self.index += 1;
        Ok(Tick { ts_ms, price, volume })
    }
}

impl Iterator for TickStream {
    type Item = Result<Tick, SimError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.total {
            return None;
        }
        let item = self.step();
        if item.is_err() {
            self.fuse();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.total - self.index).unwrap_or(usize::MAX);
        (0, Some(left))
    }
}

/// Materialize the full tick sequence.
pub fn simulate_ticks(params: &SimulationParams) -> Result<Vec<Tick>, SimError> {
    TickStream::new(params)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_params() -> SimulationParams {
        SimulationParams {
            seed: 42,
            start_ts_ms: 0,
            dt_ms: 1000,
            start_price: 100.0,
            mean_price: 100.0,
            mean_reversion_theta: 0.0,
            volatility_sigma: 0.0,
            jump_lambda_per_sec: 0.0,
            jump_std: 0.0,
            base_volume: 10.0,
            volume_vol: 0.0,
            candle_ms: 5000,
            ticks: 5,
        }
    }

    #[test]
    fn flat_process_holds_price() {
        let ticks = simulate_ticks(&flat_params()).unwrap();
        assert_eq!(ticks.len(), 5);
        for (i, t) in ticks.iter().enumerate() {
            assert_eq!(t.ts_ms, i as i64 * 1000);
            assert!((t.price - 100.0).abs() < 1e-9, "price drifted: {}", t.price);
            assert_eq!(t.volume, 10.0);
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let params = SimulationParams { jump_lambda_per_sec: 0.5, ..Default::default() };
        let a = simulate_ticks(&params).unwrap();
        let b = simulate_ticks(&params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn seeds_diverge() {
        let a = simulate_ticks(&SimulationParams { seed: 1, ..Default::default() }).unwrap();
        let b = simulate_ticks(&SimulationParams { seed: 2, ..Default::default() }).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn prices_stay_positive_under_stress() {
        let params = SimulationParams {
            volatility_sigma: 2.0,
            jump_lambda_per_sec: 5.0,
            jump_std: 0.5,
            dt_ms: 100,
            candle_ms: 1000,
            ticks: 20_000,
            ..Default::default()
        };
        for tick in TickStream::new(&params).unwrap() {
            let tick = tick.unwrap();
            assert!(tick.price > 0.0);
            assert!(tick.volume >= 0.0);
        }
    }

    #[test]
    fn mean_reversion_pulls_toward_target() {
        let params = SimulationParams {
            start_price: 200.0,
            mean_price: 100.0,
            mean_reversion_theta: 0.1,
            volatility_sigma: 0.0,
            jump_lambda_per_sec: 0.0,
            ticks: 50,
            ..Default::default()
        };
        let ticks = simulate_ticks(&params).unwrap();
        let mut prev = 200.0;
        for t in &ticks {
            assert!(t.price < prev && t.price > 100.0);
            prev = t.price;
        }
        assert!((ticks.last().unwrap().price - 100.0).abs() < 1.0);
    }

    #[test]
    fn jump_draws_shift_the_stream() {
        // A certain jump still consumes extra draws, so the diffusion path
        // diverges even though each jump is zero.
        let base = SimulationParams { ticks: 20, ..Default::default() };
        let jumpy = SimulationParams { jump_lambda_per_sec: 10.0, jump_std: 0.0, ..base.clone() };
        let a = simulate_ticks(&base).unwrap();
        let b = simulate_ticks(&jumpy).unwrap();
        assert_eq!(a[0].price, b[0].price);
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_params_never_start() {
        let params = SimulationParams { dt_ms: 0, ..Default::default() };
        assert!(matches!(
            TickStream::new(&params),
            Err(SimError::InvalidField { field: "dtMs", .. })
        ));
    }

    #[test]
    fn timestamp_overflow_is_reported() {
        let params = SimulationParams {
            start_ts_ms: i64::MAX - 1_500,
            ticks: 5,
            ..flat_params()
        };
        let mut stream = TickStream::new(&params).unwrap();
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        assert_eq!(
            stream.next().unwrap(),
            Err(SimError::TimestampOverflow { index: 2 })
        );
        assert!(stream.next().is_none());
    }

    #[test]
    fn exploding_process_is_an_error() {
        let params = SimulationParams {
            volatility_sigma: 1e308,
            ticks: 10,
            ..flat_params()
        };
        let result = simulate_ticks(&params);
        assert!(matches!(result, Err(SimError::OutOfRange { index: 0, ts_ms: 0 })));
    }
}
