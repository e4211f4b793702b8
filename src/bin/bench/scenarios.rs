// Scenario Definitions — named parameter presets for the ensemble runner
// Each scenario overrides the engine defaults; seeds are assigned per run

use market_tape_engine::SimulationParams;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: String,
    pub label: String,
    pub params: SimulationParams,
}

impl Scenario {
    fn preset(name: &str, label: &str, params: SimulationParams) -> Self {
        Self { name: name.to_string(), label: label.to_string(), params }
    }

    /// A scenario read from a user-supplied params document.
    pub fn custom(path: &std::path::Path, params: SimulationParams) -> Self {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "CUSTOM".to_string());
        Self {
            name: format!("CUSTOM_{}", stem),
            label: format!("Custom ({})", path.display()),
            params,
        }
    }

    /// Scenario parameters with the run seed substituted.
    pub fn params_for(&self, seed: u32) -> SimulationParams {
        SimulationParams { seed: i64::from(seed), ..self.params.clone() }
    }
}

// ─── Scenario Table ─────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario::preset(
            "CALM_SESSION",
            "Calm session (1s ticks, 1m candles)",
            SimulationParams::default(),
        ),
        Scenario::preset(
            "REVERSION_FROM_DISLOCATION",
            "Strong reversion from 30% dislocation",
            SimulationParams {
                start_price: 130.0,
                mean_reversion_theta: 2.0,
                volatility_sigma: 0.01,
                ..Default::default()
            },
        ),
        Scenario::preset(
            "JUMP_HEAVY",
            "Frequent jumps (lambda=0.05/s, 5% std)",
            SimulationParams {
                jump_lambda_per_sec: 0.05,
                jump_std: 0.05,
                ..Default::default()
            },
        ),
        Scenario::preset(
            "HIGH_VOL_FAST_TAPE",
            "High volatility, 100ms ticks, 5s candles",
            SimulationParams {
                dt_ms: 100,
                candle_ms: 5_000,
                ticks: 36_000,
                volatility_sigma: 0.25,
                volume_vol: 0.8,
                ..Default::default()
            },
        ),
        Scenario::preset(
            "DAILY_BARS",
            "One year of hourly ticks in daily candles",
            SimulationParams {
                start_ts_ms: 1_704_067_200_000, // 2024-01-01 00:00:00 UTC
                dt_ms: 3_600_000,
                candle_ms: 86_400_000,
                ticks: 24 * 365,
                mean_reversion_theta: 1e-6,
                volatility_sigma: 0.0005,
                jump_lambda_per_sec: 1e-7,
                jump_std: 0.08,
                base_volume: 1_000.0,
                ..Default::default()
            },
        ),
        Scenario::preset(
            "UNALIGNED_START",
            "Start mid-candle (partial first/last windows)",
            SimulationParams {
                start_ts_ms: 17_500,
                dt_ms: 500,
                candle_ms: 30_000,
                ticks: 5_000,
                ..Default::default()
            },
        ),
    ]
}
