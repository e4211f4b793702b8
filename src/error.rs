// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Errors

/// Errors surfaced by a simulation run.
///
/// Validation variants are raised before any tick is generated; the rest can
/// only occur mid-run and abort it without a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    #[error("{field} invalid: {reason}")]
    InvalidField { field: &'static str, reason: &'static str },

    #[error("candleMs must be divisible by dtMs for clean aggregation (candleMs={candle_ms}, dtMs={dt_ms})")]
    CandleNotMultiple { candle_ms: i64, dt_ms: i64 },

    #[error("tick clock overflowed after tick {index}")]
    TimestampOverflow { index: u64 },

    #[error("candle bucket for tsMs={ts_ms} starts below the representable range")]
    BucketOverflow { ts_ms: i64 },

    #[error("price or volume left the representable range at tick {index} (tsMs={ts_ms})")]
    OutOfRange { index: u64, ts_ms: i64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl SimError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidField { .. } | Self::CandleNotMultiple { .. })
    }
}
