//! Benchmark command - time the exact solver on growing rows
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: run_benchmarks(), report_results()
//! - Level 3: benchmark_row()
//! - Level 4: timing utilities, formatting

use std::time::{Duration, Instant};

use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;

use kayles_core::{Board, Outcome, Solver, MAX_PINS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Largest row to solve
    #[arg(long, default_value = "60")]
    pub max_pins: usize,

    /// Step between row lengths
    #[arg(long, default_value = "10")]
    pub step: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Timing for one row length, solved with a cold cache
#[derive(Clone, Debug)]
struct BenchmarkResult {
    pins: usize,
    outcome: Outcome,
    cold_time: Duration,
    best_move_time: Duration,
    states: usize,
    lookups: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run benchmark command
pub fn run(args: BenchmarkArgs) -> Result<()> {
    ensure!(args.step > 0, "--step must be at least 1");
    ensure!(
        args.max_pins <= MAX_PINS,
        "rows longer than {} pins are not supported",
        MAX_PINS
    );

    tracing::info!("Starting benchmarks up to {} pins", args.max_pins);
    let results = run_benchmarks(&args);
    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn run_benchmarks(args: &BenchmarkArgs) -> Vec<BenchmarkResult> {
    (args.step..=args.max_pins)
        .step_by(args.step)
        .map(|pins| {
            tracing::info!("Benchmarking {} pins...", pins);
            benchmark_row(pins)
        })
        .collect()
}

fn report_results(results: &[BenchmarkResult], json: bool) -> Result<()> {
    if json {
        print_json_results(results)
    } else {
        print_text_results(results);
        Ok(())
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Classify a full row from scratch, then pick a move with the warm cache
fn benchmark_row(pins: usize) -> BenchmarkResult {
    let mut solver = Solver::new();
    let board = Board::full(pins);

    let start = Instant::now();
    let outcome = solver.opening_outcome(pins);
    let cold_time = start.elapsed();

    let start = Instant::now();
    solver.best_move(&board);
    let best_move_time = start.elapsed();

    let stats = solver.classifier().stats();
    BenchmarkResult {
        pins,
        outcome,
        cold_time,
        best_move_time,
        states: solver.classifier().cache_len(),
        lookups: stats.lookups,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Format duration for display
fn format_duration(d: Duration) -> String {
    if d.as_secs() >= 60 {
        format!("{}m {:.1}s", d.as_secs() / 60, (d.as_secs() % 60) as f64 + d.subsec_millis() as f64 / 1000.0)
    } else if d.as_secs() >= 1 {
        format!("{:.2}s", d.as_secs_f64())
    } else if d.as_millis() >= 1 {
        format!("{:.1}ms", d.as_secs_f64() * 1000.0)
    } else {
        format!("{:.1}us", d.as_secs_f64() * 1_000_000.0)
    }
}

/// Print results as JSON
fn print_json_results(results: &[BenchmarkResult]) -> Result<()> {
    #[derive(Serialize)]
    struct JsonBenchmark {
        pins: usize,
        outcome: Outcome,
        cold_time_ms: f64,
        best_move_time_ms: f64,
        states: usize,
        lookups: u64,
    }

    let output: Vec<JsonBenchmark> = results
        .iter()
        .map(|r| JsonBenchmark {
            pins: r.pins,
            outcome: r.outcome,
            cold_time_ms: r.cold_time.as_secs_f64() * 1000.0,
            best_move_time_ms: r.best_move_time.as_secs_f64() * 1000.0,
            states: r.states,
            lookups: r.lookups,
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print results as text
fn print_text_results(results: &[BenchmarkResult]) {
    println!("\n=== Solver Benchmark ===");
    println!("{:>5}  {:<24} {:>10} {:>10} {:>10} {:>12}", "pins", "outcome", "cold", "best move", "states", "lookups");
    for r in results {
        println!(
            "{:>5}  {:<24} {:>10} {:>10} {:>10} {:>12}",
            r.pins,
            r.outcome.to_string(),
            format_duration(r.cold_time),
            format_duration(r.best_move_time),
            r.states,
            r.lookups
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_micros(2500)), "2.5ms");
        assert_eq!(format_duration(Duration::from_micros(12)), "12.0us");
    }

    #[test]
    fn test_benchmark_row() {
        let result = benchmark_row(12);
        assert_eq!(result.outcome, Outcome::SecondPlayerWins);
        assert!(result.states > 0);
        assert!(result.lookups >= result.states as u64);
    }

    #[test]
    fn test_run_benchmarks_steps() {
        let args = BenchmarkArgs {
            max_pins: 20,
            step: 5,
            json: true,
        };
        let pins: Vec<usize> = run_benchmarks(&args).iter().map(|r| r.pins).collect();
        assert_eq!(pins, vec![5, 10, 15, 20]);
    }
}
