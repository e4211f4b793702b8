// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Pipeline

use crate::aggregator::CandleAggregator;
use crate::error::SimError;
use crate::process::TickStream;
use crate::types::{SimulationParams, SimulationResult};

/// Validate, simulate and aggregate in one streaming pass.
///
/// Ticks are folded into the aggregator as they are produced and never
/// materialized. Either the full candle sequence or the first error is
/// returned; there are no partial results.
pub fn run_simulation(params: &SimulationParams) -> Result<SimulationResult, SimError> {
    let stream = TickStream::new(params).map_err(|err| {
        tracing::warn!(error = %err, "rejected simulation parameters");
        err
    })?;

    tracing::debug!(
        seed = params.seed,
        ticks = params.ticks,
        dt_ms = params.dt_ms,
        candle_ms = params.candle_ms,
        "simulation started"
    );

    let mut aggregator = CandleAggregator::new(params.candle_ms);
    let capacity = expected_candles(params).min(1 << 16);
    let mut candles = Vec::with_capacity(capacity);
    for tick in stream {
        let tick = tick?;
        candles.extend(aggregator.push(&tick)?);
    }
    candles.extend(aggregator.finish());

    tracing::debug!(candles = candles.len(), "simulation finished");
    Ok(SimulationResult { candles })
}

/// Upper bound on the number of candles a valid run can produce.
pub fn expected_candles(params: &SimulationParams) -> usize {
    let per_candle = params.ticks_per_candle().max(1) as u64;
    // +1 for a partial window at each end when the start is unaligned
    let full = params.ticks / per_candle;
    let bound = if params.start_ts_ms.rem_euclid(params.candle_ms.max(1)) == 0 {
        full + u64::from(params.ticks % per_candle != 0)
    } else {
        full + 2
    };
    usize::try_from(bound.min(params.ticks)).unwrap_or(usize::MAX)
}
