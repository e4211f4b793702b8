// Tape Ensemble Runner v0.1.0 — seeded Monte Carlo over parameter presets
// Runs each scenario N times, audits every candle sequence, writes a JSON report
//
// Usage:
//   cargo run --release --bin bench                          # All scenarios (30 runs each)
//   cargo run --release --bin bench -- --runs 5              # Quick mode (5 runs each)
//   cargo run --release --bin bench -- JUMP                  # Filter by name
//   cargo run --release --bin bench -- --time-series         # Enable JSONL candle output
//   cargo run --release --bin bench -- --seed 42             # Custom base seed
//   cargo run --release --bin bench -- --params my.json      # Add a custom scenario

mod report;
mod scenarios;
mod monte_carlo;
mod metrics;
mod time_series;

use market_tape_engine::SimulationParams;
use report::*;
use scenarios::*;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

// ─── CLI Parsing ────────────────────────────────────────────────────────────

struct CliArgs {
    runs: usize,
    seed: u64,
    time_series: bool,
    params: Option<PathBuf>,
    filter: Option<String>,
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut cli = CliArgs {
        runs: 30,
        seed: 0,
        time_series: false,
        params: None,
        filter: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--runs" => {
                i += 1;
                if i < args.len() {
                    cli.runs = args[i].parse().unwrap_or(30);
                }
            }
            "--seed" => {
                i += 1;
                if i < args.len() {
                    cli.seed = args[i].parse().unwrap_or(0);
                }
            }
            "--params" => {
                i += 1;
                if i < args.len() {
                    cli.params = Some(PathBuf::from(&args[i]));
                }
            }
            "--time-series" => {
                cli.time_series = true;
            }
            arg if !arg.starts_with('-') => {
                cli.filter = Some(arg.to_string());
            }
            _ => {
                tracing::warn!(argument = %args[i], "unknown argument");
            }
        }
        i += 1;
    }

    cli
}

fn load_params(path: &std::path::Path) -> Result<SimulationParams, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    serde_json::from_str(&text).map_err(|e| format!("cannot parse {}: {}", path.display(), e))
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() {
    init_tracing();
    let cli = parse_args();
    let mut all_scenarios = scenarios();

    if let Some(path) = &cli.params {
        match load_params(path) {
            Ok(params) => all_scenarios.push(Scenario::custom(path, params)),
            Err(e) => {
                tracing::error!(error = %e, "failed to load custom params");
                std::process::exit(1);
            }
        }
    }

    let to_run: Vec<&Scenario> = match &cli.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all_scenarios.iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all_scenarios.iter().collect(),
    };

    if to_run.is_empty() {
        tracing::error!(filter = ?cli.filter, "no scenarios match filter");
        std::process::exit(1);
    }

    let ts_dir = if cli.time_series {
        Some(std::path::Path::new("benchmark-results/time-series").to_path_buf())
    } else {
        None
    };

    tracing::info!(runs = cli.runs, base_seed = cli.seed, scenarios = to_run.len(), "starting ensemble");

    println!("\n  Tape Ensemble Runner v0.1.0");
    println!("  Engine PRNG: xorshift32 | Seed source: ChaCha8Rng | Runs/scenario: {} | Base seed: {}",
        cli.runs, cli.seed);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<44} {:>5} {:>8} {:>12} {:>9} {:>8} {:>7}",
        "Scenario", "Pass%", "Candles", "Close", "RVol", "MaxDD", "Time");
    println!("  {}", "-".repeat(100));

    let suite_start = Instant::now();
    let mut mc_reports = Vec::new();

    for scenario in &to_run {
        let report = monte_carlo::run_monte_carlo(
            scenario,
            cli.runs,
            cli.seed,
            ts_dir.as_deref(),
        );

        let pass_pct = report.pass_rate * 100.0;
        let close_ci = (report.final_close.ci_upper - report.final_close.ci_lower) / 2.0;
        let status = if report.pass_rate >= 1.0 { "PASS" } else { "FAIL" };

        println!("  {:<44} {:>4}% {:>8.0} {:>7.2}±{:<4.2} {:>9.5} {:>7.2}% {:>5.0}ms  {}",
            report.label,
            pass_pct as u32,
            report.candle_count.mean,
            report.final_close.mean, close_ci,
            report.realized_vol.mean,
            report.max_drawdown.mean * 100.0,
            report.elapsed_ms.mean,
            status,
        );

        mc_reports.push(report);
    }

    let suite_elapsed = suite_start.elapsed();

    // ─── Summary ────────────────────────────────────────────────────────

    let total = mc_reports.len();
    let passed = mc_reports.iter().filter(|r| r.pass_rate >= 1.0).count();
    let failed = total - passed;

    println!("  {}", "-".repeat(100));
    println!("  Total: {}  Passed: {}  Failed: {}  Suite time: {:.1}s\n",
        total, passed, failed, suite_elapsed.as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let timestamp = format!("{}", ts);

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "xorshift32",
        seed_source: "ChaCha8Rng",
        n_runs_per_scenario: cli.runs,
        summary: Summary {
            total,
            passed,
            failed,
            pass_rate: passed as f64 / total as f64,
        },
        scenarios: mc_reports,
    };

    let path = std::path::Path::new("benchmark-results").join(format!("bench-{}.json", timestamp));
    match write_report(&path, &report) {
        Ok(()) => println!("  Results saved to: {}\n", path.display()),
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to write report");
            std::process::exit(1);
        }
    }

    if failed > 0 {
        std::process::exit(1);
    }
}

fn write_report(path: &std::path::Path, report: &BenchReport) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    std::fs::write(path, json)
}
