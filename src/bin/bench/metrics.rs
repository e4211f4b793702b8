// Tape Metrics — invariant audit and path statistics over candle sequences

use market_tape_engine::{bucket_start, Candle, SimulationParams, Tick};

/// Count candle invariant violations against the ticks that produced them:
/// OHLC ordering, bucket alignment, ordering of candles, per-bucket volume and
/// (for interior buckets) exact tick counts.
pub fn audit_candles(params: &SimulationParams, ticks: &[Tick], candles: &[Candle]) -> u32 {
    let mut violations = 0u32;
    let per_candle = params.ticks_per_candle();

    for window in candles.windows(2) {
        if window[1].ts_ms <= window[0].ts_ms {
            violations += 1;
        }
    }

    let mut cursor = 0usize;
    for (i, candle) in candles.iter().enumerate() {
        if !candle.is_consistent() || candle.ts_ms.rem_euclid(params.candle_ms) != 0 {
            violations += 1;
        }

        let start = cursor;
        while cursor < ticks.len() && bucket_start(ticks[cursor].ts_ms, params.candle_ms) == Some(candle.ts_ms) {
            cursor += 1;
        }
        let members = &ticks[start..cursor];
        if members.is_empty() {
            violations += 1;
            continue;
        }

        let volume: f64 = members.iter().map(|t| t.volume).sum();
        if (volume - candle.volume).abs() > 1e-9 * volume.abs().max(1.0) {
            violations += 1;
        }
        if members[0].price != candle.open || members[members.len() - 1].price != candle.close {
            violations += 1;
        }

        let interior = i > 0 && i + 1 < candles.len();
        if interior && members.len() as i64 != per_candle {
            violations += 1;
        }
    }

    if cursor != ticks.len() {
        violations += 1;
    }
    violations
}

/// Sample standard deviation of close-to-close log returns.
pub fn realized_vol(candles: &[Candle]) -> f64 {
    let returns: Vec<f64> = candles
        .windows(2)
        .map(|w| (w[1].close / w[0].close).ln())
        .collect();
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let var = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (returns.len() - 1) as f64;
    var.sqrt()
}

/// Largest peak-to-trough decline of the high/low path, as a fraction of the peak.
pub fn max_drawdown(candles: &[Candle]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for c in candles {
        peak = peak.max(c.high);
        if peak > 0.0 {
            worst = worst.max((peak - c.low) / peak);
        }
    }
    worst
}
