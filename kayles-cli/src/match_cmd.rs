//! Match command - the solver against a uniformly random player
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use anyhow::{ensure, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use kayles_core::{Board, GameConfig, Move, Side, Solver};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// Number of games to play (the solver alternates between first and second)
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Pins in the starting row
    #[arg(long, default_value = "20")]
    pub pins: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game; the solver plays `Side::Ai`
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    first: Side,
    /// Solver had a forced win from the start
    solver_favoured: bool,
    winner: Side,
    moves: usize,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    pins: usize,
    games: Vec<GameRecord>,
    solver_wins: usize,
    random_wins: usize,
    /// Favoured games the solver failed to win (always zero for a correct solver)
    missed_wins: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    GameConfig::new(args.pins, Side::Ai).validate()?;
    ensure!(args.games > 0, "--games must be at least 1");

    tracing::info!(
        "Starting match: solver vs random ({} games, {} pins)",
        args.games,
        args.pins
    );

    let results = play_match(&args, seed);
    report_results(&results, &args)?;

    ensure!(
        results.missed_wins == 0,
        "solver failed to convert {} winning starts",
        results.missed_wins
    );
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match, sharing one solver cache
fn play_match(args: &MatchArgs, seed: Option<u64>) -> MatchResults {
    let mut rng = create_rng(seed);
    let mut solver = Solver::new();
    let progress = create_progress_bar(args.games, args.json);

    let games = (0..args.games)
        .map(|game_num| {
            let first = if game_num % 2 == 0 { Side::Ai } else { Side::Human };
            let record = play_single_game(&mut solver, &mut rng, args.pins, first, game_num + 1);
            tracing::debug!(
                "Game {}: {} won after {} moves",
                record.game_number,
                record.winner,
                record.moves
            );
            progress.inc(1);
            record
        })
        .collect();
    progress.finish_and_clear();

    tracing::info!("Solver cache: {} states", solver.classifier().cache_len());
    compute_statistics(args.pins, games)
}

fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One game from a full row; the random player is `Side::Human`
fn play_single_game(
    solver: &mut Solver,
    rng: &mut ChaCha8Rng,
    pins: usize,
    first: Side,
    game_number: usize,
) -> GameRecord {
    let mut board = Board::full(pins);
    let start_is_p = solver.is_p(&board);
    let solver_favoured = (first == Side::Ai) != start_is_p;

    let mut to_move = first;
    let mut moves = 0;
    loop {
        let mv: Option<Move> = match to_move {
            Side::Ai => solver.best_move(&board),
            Side::Human => board.legal_moves().choose(rng).copied(),
        };
        let Some(mv) = mv else { break };
        board.remove_pair(mv);
        moves += 1;
        to_move = to_move.opponent();
    }

    GameRecord {
        game_number,
        first,
        solver_favoured,
        // The side left without a move wins
        winner: to_move,
        moves,
    }
}

fn compute_statistics(pins: usize, games: Vec<GameRecord>) -> MatchResults {
    let solver_wins = games.iter().filter(|g| g.winner == Side::Ai).count();
    let missed_wins = games
        .iter()
        .filter(|g| g.solver_favoured && g.winner != Side::Ai)
        .count();
    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    MatchResults {
        pins,
        random_wins: games.len() - solver_wins,
        games,
        solver_wins,
        missed_wins,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn create_progress_bar(games: usize, hidden: bool) -> ProgressBar {
    if hidden {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(games as u64);
    if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} games") {
        bar.set_style(style);
    }
    bar
}

fn percent(part: usize, total: usize) -> f32 {
    if total > 0 {
        part as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.games.len();
    let favoured = results.games.iter().filter(|g| g.solver_favoured).count();

    println!("\n=== Match Results ({} pins) ===", results.pins);
    println!("Total games:  {}", total);
    println!(
        "Solver wins:  {} ({:.1}%)",
        results.solver_wins,
        percent(results.solver_wins, total)
    );
    println!(
        "Random wins:  {} ({:.1}%)",
        results.random_wins,
        percent(results.random_wins, total)
    );
    println!("Winning starts converted: {}/{}", favoured - results.missed_wins, favoured);
    println!("Avg moves:    {:.1}", results.avg_moves);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(10, vec![]);
        assert_eq!(results.solver_wins, 0);
        assert_eq!(results.random_wins, 0);
        assert_eq!(results.avg_moves, 0.0);
    }

    #[test]
    fn test_solver_converts_every_winning_start() {
        let args = MatchArgs {
            games: 20,
            pins: 30,
            json: true,
        };
        let results = play_match(&args, Some(42));
        assert_eq!(results.games.len(), 20);
        assert_eq!(results.missed_wins, 0);
        // Thirty pins is a P-position: the solver wins whenever it moves second
        assert!(results
            .games
            .iter()
            .filter(|g| g.first == Side::Human)
            .all(|g| g.solver_favoured && g.winner == Side::Ai));
    }

    #[test]
    fn test_single_game_winner_is_side_without_moves() {
        let mut solver = Solver::new();
        let mut rng = create_rng(Some(1));
        // Three pins: the first mover must leave one pin and loses
        let record = play_single_game(&mut solver, &mut rng, 3, Side::Ai, 1);
        assert_eq!(record.moves, 1);
        assert_eq!(record.winner, Side::Human);
        assert!(!record.solver_favoured);
    }

    #[test]
    fn test_create_rng_deterministic() {
        let mut rng1 = create_rng(Some(42));
        let mut rng2 = create_rng(Some(42));

        use rand::Rng;
        assert_eq!(rng1.gen::<u64>(), rng2.gen::<u64>());
    }
}
