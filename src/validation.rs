// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Market Tape Simulation Engine - Parameter Validation

use crate::error::SimError;
use crate::types::SimulationParams;

type Check = (bool, &'static str, &'static str);

fn positive(x: f64) -> bool {
    x.is_finite() && x > 0.0
}

fn non_negative(x: f64) -> bool {
    x.is_finite() && x >= 0.0
}

/// Check every field, returning the first violation in declaration order.
///
/// Integer fields are finite by construction; only their signs are checked.
pub fn validate(p: &SimulationParams) -> Result<(), SimError> {
    let checks: [Check; 11] = [
        (p.dt_ms > 0, "dtMs", "must be > 0"),
        (positive(p.start_price), "startPrice", "must be finite and > 0"),
        (positive(p.mean_price), "meanPrice", "must be finite and > 0"),
        (non_negative(p.mean_reversion_theta), "meanReversionTheta", "must be finite and >= 0"),
        (non_negative(p.volatility_sigma), "volatilitySigma", "must be finite and >= 0"),
        (non_negative(p.jump_lambda_per_sec), "jumpLambdaPerSec", "must be finite and >= 0"),
        (non_negative(p.jump_std), "jumpStd", "must be finite and >= 0"),
        (non_negative(p.base_volume), "baseVolume", "must be finite and >= 0"),
        (non_negative(p.volume_vol), "volumeVol", "must be finite and >= 0"),
        (p.candle_ms > 0, "candleMs", "must be > 0"),
        (p.ticks > 0, "ticks", "must be > 0"),
    ];

    if let Some(&(_, field, reason)) = checks.iter().find(|(ok, _, _)| !ok) {
        return Err(SimError::InvalidField { field, reason });
    }

    if p.candle_ms % p.dt_ms != 0 {
        return Err(SimError::CandleNotMultiple { candle_ms: p.candle_ms, dt_ms: p.dt_ms });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: SimError) -> &'static str {
        match err {
            SimError::InvalidField { field, .. } => field,
            other => panic!("expected field error, got {:?}", other),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate(&SimulationParams::default()), Ok(()));
    }

    #[test]
    fn zero_dt_rejected() {
        let p = SimulationParams { dt_ms: 0, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "dtMs");
    }

    #[test]
    fn non_finite_reals_rejected() {
        let p = SimulationParams { volatility_sigma: f64::NAN, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "volatilitySigma");

        let p = SimulationParams { start_price: f64::INFINITY, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "startPrice");
    }

    #[test]
    fn sign_rules() {
        let p = SimulationParams { mean_price: 0.0, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "meanPrice");

        let p = SimulationParams { jump_std: -0.1, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "jumpStd");

        // zero is allowed for the non-negative fields
        let p = SimulationParams {
            mean_reversion_theta: 0.0,
            volatility_sigma: 0.0,
            jump_lambda_per_sec: 0.0,
            jump_std: 0.0,
            base_volume: 0.0,
            volume_vol: 0.0,
            ..Default::default()
        };
        assert!(validate(&p).is_ok());
    }

    #[test]
    fn first_failure_wins() {
        let p = SimulationParams {
            base_volume: -1.0,
            start_price: -1.0,
            ticks: 0,
            ..Default::default()
        };
        assert_eq!(field_of(validate(&p).unwrap_err()), "startPrice");
    }

    #[test]
    fn candle_must_be_multiple_of_dt() {
        let p = SimulationParams { candle_ms: 250, dt_ms: 100, ..Default::default() };
        let err = validate(&p).unwrap_err();
        assert_eq!(err, SimError::CandleNotMultiple { candle_ms: 250, dt_ms: 100 });
        assert!(err.to_string().contains("divisible by dtMs"));
    }

    #[test]
    fn zero_ticks_rejected() {
        let p = SimulationParams { ticks: 0, ..Default::default() };
        assert_eq!(field_of(validate(&p).unwrap_err()), "ticks");
    }
}
