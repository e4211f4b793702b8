// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Deterministic Random Source

use std::f64::consts::PI;

/// Replacement state for a zero seed; zero is a fixed point of xorshift.
pub const ZERO_SEED_STATE: u32 = 0xdead_beef;

const TWO_POW_32: f64 = 4_294_967_296.0;

/// Marsaglia xorshift32 generator.
///
/// Every run owns its own instance; two generators built from the same seed
/// and queried identically yield identical streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_STATE } else { seed };
        Self { state }
    }

    /// Seed from any integer, keeping its unsigned 32-bit view.
    pub fn from_seed(seed: i64) -> Self {
        Self::new(seed as u32)
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / TWO_POW_32
    }

    /// Standard normal via Box-Muller (cosine branch only).
    pub fn next_normal(&mut self) -> f64 {
        let u = self.next_nonzero_f64();
        let v = self.next_nonzero_f64();
        (-2.0 * u.ln()).sqrt() * (2.0 * PI * v).cos()
    }

    /// xorshift maps nonzero states to nonzero states, so a seeded generator
    /// never yields 0 and the retry never runs. It keeps `ln` finite if the
    /// core step ever changes.
    fn next_nonzero_f64(&mut self) -> f64 {
        loop {
            let x = self.next_f64();
            if x != 0.0 {
                return x;
            }
        }
    }
}
