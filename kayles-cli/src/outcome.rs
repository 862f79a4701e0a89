//! Outcome command - who wins a fresh row of pins
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: compute_table(), report_table()
//! - Level 4: formatting utilities

use anyhow::{ensure, Result};
use clap::Args;
use serde::Serialize;

use kayles_core::{Outcome, Solver, MAX_PINS};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct OutcomeArgs {
    /// Smallest pin count
    #[arg(long, default_value = "2")]
    pub from: usize,

    /// Largest pin count
    #[arg(long, default_value = "30")]
    pub to: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, Serialize)]
struct OutcomeRow {
    pins: usize,
    outcome: Outcome,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run outcome command
pub fn run(args: OutcomeArgs) -> Result<()> {
    ensure!(args.from <= args.to, "--from must not exceed --to");
    ensure!(
        args.to <= MAX_PINS,
        "rows longer than {} pins are not supported",
        MAX_PINS
    );

    tracing::info!("Classifying rows of {} to {} pins", args.from, args.to);

    let mut solver = Solver::new();
    let rows = compute_table(&mut solver, args.from, args.to);
    report_table(&rows, args.json)?;

    tracing::info!("Cache holds {} states", solver.classifier().cache_len());
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn compute_table(solver: &mut Solver, from: usize, to: usize) -> Vec<OutcomeRow> {
    (from..=to)
        .map(|pins| OutcomeRow {
            pins,
            outcome: solver.opening_outcome(pins),
        })
        .collect()
}

fn report_table(rows: &[OutcomeRow], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
    } else {
        for row in rows {
            println!("{:>4}  {}", row.pins, row.outcome);
        }
        println!("\nSecond-player wins at: {}", p_positions(rows));
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Comma-separated pin counts where the second player wins
fn p_positions(rows: &[OutcomeRow]) -> String {
    rows.iter()
        .filter(|row| row.outcome == Outcome::SecondPlayerWins)
        .map(|row| row.pins.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// TESTS
// ============================================================================
