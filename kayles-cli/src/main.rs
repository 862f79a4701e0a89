//! KAYLES CLI - Command-line interface
//!
//! Commands:
//! - outcome: Who wins a fresh row, for a range of pin counts
//! - classify: P/N verdict for a board
//! - best-move: Recommended move for a board
//! - play: Play against the solver on the terminal
//! - match: Solver vs a random player
//! - benchmark: Time the solver on growing rows
//! - serve: Start the HTTP API

mod analyze;
mod benchmark;
mod match_cmd;
mod outcome;
mod play;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kayles")]
#[command(about = "Exact solver for misère Dawson's Kayles")]
struct Cli {
    /// Seed for commands that use randomness
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Who wins a fresh row of pins
    Outcome(outcome::OutcomeArgs),
    /// Classify a board as P or N
    Classify(analyze::AnalyzeArgs),
    /// Recommend a move for a board
    BestMove(analyze::AnalyzeArgs),
    /// Play against the solver
    Play(play::PlayArgs),
    /// Solver vs a random player
    Match(match_cmd::MatchArgs),
    /// Time the solver on growing rows
    Benchmark(benchmark::BenchmarkArgs),
    /// Start the HTTP API server
    Serve(server::ServerArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Outcome(args) => outcome::run(args),
        Commands::Classify(args) => analyze::run_classify(args),
        Commands::BestMove(args) => analyze::run_best_move(args),
        Commands::Play(args) => play::run(args),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
        Commands::Benchmark(args) => benchmark::run(args),
        Commands::Serve(args) => server::run(args),
    }
}

/// `RUST_LOG` wins over `-v`
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
