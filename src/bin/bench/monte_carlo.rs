// Monte Carlo Infrastructure — N seeded runs per scenario with statistical aggregation
// Run seeds are drawn from a ChaCha8 stream keyed by the base seed, so an
// ensemble is reproducible from (base seed, N) alone

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use market_tape_engine::*;

use crate::metrics::{audit_candles, max_drawdown, realized_vol};
use crate::report::*;
use crate::scenarios::Scenario;
use crate::time_series;

use std::time::Instant;

/// Derive `n` engine seeds from a base seed.
pub fn derive_seeds(base_seed: u64, n: usize) -> Vec<u32> {
    let mut rng = ChaCha8Rng::seed_from_u64(base_seed);
    (0..n).map(|_| rng.gen::<u32>()).collect()
}

fn failed_run(scenario: &Scenario, seed: u32, err: SimError, elapsed_ms: u128) -> BenchResult {
    BenchResult {
        scenario: scenario.label.clone(),
        name: scenario.name.clone(),
        seed,
        pass: false,
        error: Some(err.to_string()),
        ticks: scenario.params.ticks,
        candle_count: 0,
        final_close: 0.0,
        total_volume: 0.0,
        realized_vol: 0.0,
        max_drawdown: 0.0,
        invariant_violations: 0,
        reproducible: false,
        elapsed_ms,
        ticks_per_sec: 0.0,
    }
}

/// Run a single scenario iteration with a specific seed.
pub fn run_single(
    scenario: &Scenario,
    seed: u32,
    time_series_dir: Option<&std::path::Path>,
) -> BenchResult {
    let params = scenario.params_for(seed);

    let start = Instant::now();
    let outcome = run_simulation(&params);
    let elapsed = start.elapsed();
    let elapsed_ms = elapsed.as_millis();

    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(scenario = %scenario.name, seed, error = %err, "run failed");
            return failed_run(scenario, seed, err, elapsed_ms);
        }
    };

    // Audit against the materialized tick sequence
    let invariant_violations = match simulate_ticks(&params) {
        Ok(ticks) => audit_candles(&params, &ticks, &result.candles),
        Err(err) => {
            tracing::error!(scenario = %scenario.name, seed, error = %err, "tick replay failed");
            return failed_run(scenario, seed, err, elapsed_ms);
        }
    };
    let reproducible = run_simulation(&params).as_ref() == Ok(&result);

    if let Some(dir) = time_series_dir {
        let path = dir.join(format!("seed-{}.jsonl", seed));
        if let Err(e) = time_series::write_jsonl(&path, &result.candles) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write time series");
        }
    }

    if invariant_violations > 0 || !reproducible {
        tracing::warn!(
            scenario = %scenario.name,
            seed,
            invariant_violations,
            reproducible,
            "run failed audit"
        );
    }

    let elapsed_secs = elapsed.as_secs_f64().max(0.001);
    BenchResult {
        scenario: scenario.label.clone(),
        name: scenario.name.clone(),
        seed,
        pass: invariant_violations == 0 && reproducible,
        error: None,
        ticks: params.ticks,
        candle_count: result.len(),
        final_close: result.last_close().unwrap_or(0.0),
        total_volume: result.total_volume(),
        realized_vol: realized_vol(&result.candles),
        max_drawdown: max_drawdown(&result.candles),
        invariant_violations,
        reproducible,
        elapsed_ms,
        ticks_per_sec: params.ticks as f64 / elapsed_secs,
    }
}

/// Run Monte Carlo: N runs of a scenario, aggregate stats.
pub fn run_monte_carlo(
    scenario: &Scenario,
    n_runs: usize,
    base_seed: u64,
    time_series_base: Option<&std::path::Path>,
) -> MonteCarloReport {
    let ts_dir = time_series_base.map(|base| base.join(scenario.name.to_lowercase()));

    let results: Vec<BenchResult> = derive_seeds(base_seed, n_runs)
        .into_iter()
        .map(|seed| run_single(scenario, seed, ts_dir.as_deref()))
        .collect();

    aggregate_runs(scenario, results)
}

/// Aggregate individual runs into a MonteCarloReport.
fn aggregate_runs(scenario: &Scenario, results: Vec<BenchResult>) -> MonteCarloReport {
    let n = results.len();
    let passed = results.iter().filter(|r| r.pass).count();
    let pass_rate = if n > 0 { passed as f64 / n as f64 } else { 0.0 };

    // Failed runs carry no path statistics
    let ok: Vec<&BenchResult> = results.iter().filter(|r| r.error.is_none()).collect();

    MonteCarloReport {
        scenario_name: scenario.name.clone(),
        label: scenario.label.clone(),
        n_runs: n,
        pass_rate,
        final_close: stat(&ok, |r| r.final_close),
        total_volume: stat(&ok, |r| r.total_volume),
        realized_vol: stat(&ok, |r| r.realized_vol),
        max_drawdown: stat(&ok, |r| r.max_drawdown),
        candle_count: stat(&ok, |r| r.candle_count as f64),
        elapsed_ms: stat(&ok, |r| r.elapsed_ms as f64),
        ticks_per_sec: stat(&ok, |r| r.ticks_per_sec),
        individual_runs: results,
    }
}

fn stat(runs: &[&BenchResult], metric: fn(&BenchResult) -> f64) -> Stats {
    Stats::from_samples(&runs.iter().map(|r| metric(*r)).collect::<Vec<_>>())
}
