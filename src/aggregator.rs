// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Candle Aggregator

use crate::error::SimError;
use crate::types::{Candle, Tick};

/// Aligned start of the bucket containing `ts_ms` (floor division).
///
/// `None` when the floored start lies below `i64::MIN`.
pub fn bucket_start(ts_ms: i64, candle_ms: i64) -> Option<i64> {
    ts_ms.checked_sub(ts_ms.rem_euclid(candle_ms))
}

/// Single-pass OHLCV bucketing with one in-flight candle.
///
/// Ticks must arrive with non-decreasing timestamps. Empty buckets produce
/// nothing; there is no gap filling.
#[derive(Debug, Clone)]
pub struct CandleAggregator {
    candle_ms: i64,
    current: Option<Candle>,
}

impl CandleAggregator {
    /// `candle_ms` must be positive.
    pub fn new(candle_ms: i64) -> Self {
        debug_assert!(candle_ms > 0, "candle width must be positive");
        Self { candle_ms, current: None }
    }

    pub fn candle_ms(&self) -> i64 {
        self.candle_ms
    }

    /// The candle still accumulating, if any.
    pub fn pending(&self) -> Option<&Candle> {
        self.current.as_ref()
    }

    /// Fold one tick in. Returns the previous candle when this tick opens a
    /// new bucket.
    pub fn push(&mut self, tick: &Tick) -> Result<Option<Candle>, SimError> {
        let slot = bucket_start(tick.ts_ms, self.candle_ms)
            .ok_or(SimError::BucketOverflow { ts_ms: tick.ts_ms })?;
        if let Some(cur) = self.current.as_mut() {
            if cur.ts_ms == slot {
                cur.absorb(tick);
                return Ok(None);
            }
        }
        Ok(self.current.replace(Candle::open_at(slot, tick)))
    }

    /// Flush the last candle.
    pub fn finish(self) -> Option<Candle> {
        self.current
    }
}

/// Fold a whole tick sequence into candles.
pub fn aggregate<'a, I>(ticks: I, candle_ms: i64) -> Result<Vec<Candle>, SimError>
where
    I: IntoIterator<Item = &'a Tick>,
{
    let mut agg = CandleAggregator::new(candle_ms);
    let mut out = Vec::new();
    for tick in ticks {
        out.extend(agg.push(tick)?);
    }
    out.extend(agg.finish());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(ts_ms: i64, price: f64, volume: f64) -> Tick {
        Tick { ts_ms, price, volume }
    }

    #[test]
    fn bucket_floors_timestamps() {
        assert_eq!(bucket_start(0, 5000), Some(0));
        assert_eq!(bucket_start(4999, 5000), Some(0));
        assert_eq!(bucket_start(5000, 5000), Some(5000));
        assert_eq!(bucket_start(-1, 5000), Some(-5000));
        assert_eq!(bucket_start(-5000, 5000), Some(-5000));
    }

    #[test]
    fn bucket_below_i64_min_is_none() {
        assert_eq!(bucket_start(i64::MIN, 5000), None);
        assert_eq!(bucket_start(i64::MIN + 1000, 5000), Some(i64::MIN + 808));
        assert_eq!(bucket_start(i64::MIN, 1 << 20), Some(i64::MIN));
        assert_eq!(bucket_start(i64::MAX, 5000), Some(i64::MAX - 807));
    }

    #[test]
    fn push_rejects_unrepresentable_bucket() {
        let mut agg = CandleAggregator::new(5000);
        assert_eq!(
            agg.push(&tick(i64::MIN, 1.0, 1.0)),
            Err(SimError::BucketOverflow { ts_ms: i64::MIN })
        );
        assert!(agg.pending().is_none());

        let ticks = [tick(i64::MIN, 1.0, 1.0), tick(i64::MIN + 1000, 1.0, 1.0)];
        assert!(aggregate(&ticks, 5000).is_err());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(aggregate(&Vec::<Tick>::new(), 1000).unwrap().is_empty());
    }

    #[test]
    fn ohlcv_within_one_bucket() {
        let ticks = [
            tick(0, 10.0, 1.0),
            tick(1000, 13.0, 2.0),
            tick(2000, 8.0, 3.0),
            tick(3000, 11.0, 4.0),
        ];
        let candles = aggregate(&ticks, 5000).unwrap();
        assert_eq!(
            candles,
            vec![Candle { ts_ms: 0, open: 10.0, high: 13.0, low: 8.0, close: 11.0, volume: 10.0 }]
        );
    }

    #[test]
    fn buckets_split_on_boundary() {
        let ticks: Vec<Tick> = (0..10).map(|i| tick(i * 1000, 100.0 + i as f64, 1.0)).collect();
        let candles = aggregate(&ticks, 3000).unwrap();
        let sizes: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        assert_eq!(sizes, vec![3.0, 3.0, 3.0, 1.0]);
        assert_eq!(candles[1].ts_ms, 3000);
        assert_eq!(candles[1].open, 103.0);
        assert_eq!(candles[1].close, 105.0);
        assert_eq!(candles[3].open, 109.0);
    }

    #[test]
    fn unaligned_start_gives_partial_first_candle() {
        let ticks: Vec<Tick> = (0..6).map(|i| tick(2000 + i * 1000, 1.0, 1.0)).collect();
        let candles = aggregate(&ticks, 4000).unwrap();
        let counts: Vec<f64> = candles.iter().map(|c| c.volume).collect();
        assert_eq!(counts, vec![2.0, 4.0]);
        assert_eq!(candles[0].ts_ms, 0);
        assert_eq!(candles[1].ts_ms, 4000);
    }

    #[test]
    fn empty_buckets_are_skipped() {
        let ticks = [tick(0, 1.0, 1.0), tick(25_000, 2.0, 1.0)];
        let candles = aggregate(&ticks, 5000).unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[1].ts_ms, 25_000);
    }

    #[test]
    fn push_reports_closed_candle() {
        let mut agg = CandleAggregator::new(2000);
        assert!(agg.push(&tick(0, 5.0, 1.0)).unwrap().is_none());
        assert!(agg.push(&tick(1000, 6.0, 1.0)).unwrap().is_none());
        let closed = agg.push(&tick(2000, 7.0, 1.0)).unwrap().unwrap();
        assert_eq!(closed.close, 6.0);
        assert_eq!(agg.pending().unwrap().open, 7.0);
        assert_eq!(agg.finish().unwrap().ts_ms, 2000);
    }
}
