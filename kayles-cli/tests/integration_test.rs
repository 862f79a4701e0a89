//! Integration tests for the KAYLES solver
//!
//! Tests the full stack: board parsing, classification, move selection,
//! the game controller and the HTTP layer sharing one solver.

use kayles_core::{
    Board, FallbackPolicy, Game, GameConfig, GameResult, Outcome, Position, Side, Solver,
};
use kayles_server::{create_router, ServerConfig, ServerState};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Drive a game to the end: solver for the AI, random legal moves for the human
fn play_against_random(config: GameConfig, solver: &mut Solver, rng: &mut ChaCha8Rng) -> Game {
    let mut game = Game::new(config).unwrap();
    while !game.is_over() {
        match game.to_move() {
            Side::Ai => {
                game.play_ai(solver).unwrap();
            }
            Side::Human => {
                let mv = *game.board().legal_moves().choose(rng).unwrap();
                let (a, b) = mv.pins();
                game.play_pair(b, a).unwrap();
            }
        }
    }
    game
}

// ============================================================================
// GAME CONTROLLER TESTS
// ============================================================================

#[test]
fn test_ai_wins_every_favoured_start() {
    let mut solver = Solver::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);

    for pins in 2..=40 {
        let outcome = solver.opening_outcome(pins);
        // The AI is favoured when it moves first into an N row or second into a P row
        let first = match outcome {
            Outcome::FirstPlayerWins => Side::Ai,
            Outcome::SecondPlayerWins => Side::Human,
        };
        let game = play_against_random(GameConfig::new(pins, first), &mut solver, &mut rng);
        assert_eq!(
            game.result(),
            GameResult::Won(Side::Ai),
            "AI lost a favoured game with {pins} pins"
        );
    }
}

#[test]
fn test_game_history_replays_to_final_board() {
    let mut solver = Solver::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let game = play_against_random(GameConfig::new(25, Side::Human), &mut solver, &mut rng);

    let mut board = Board::full(25);
    for (_, mv) in game.history() {
        assert!(board.is_legal(*mv));
        board.remove_pair(*mv);
    }
    assert_eq!(&board, game.board());
    assert!(!board.has_moves());
}

// ============================================================================
// SOLVER TESTS
// ============================================================================

#[test]
fn test_sixty_pin_opening() {
    let mut solver = Solver::new();
    let start = Instant::now();
    let outcome = solver.opening_outcome(60);
    let elapsed = start.elapsed();

    assert_eq!(outcome, Outcome::FirstPlayerWins);
    println!(
        "60 pins: {:?}, {} states cached",
        elapsed,
        solver.classifier().cache_len()
    );

    let board = Board::full(60);
    let mv = solver.best_move(&board).expect("sixty pins has moves");
    assert_eq!(solver.classify(&board.apply(mv)), Position::P);
}

#[test]
fn test_fallback_policy_only_matters_when_losing() {
    let board: Board = "1111111111110111".parse().unwrap();
    let mut middle = Solver::with_fallback(FallbackPolicy::Middle);
    let mut first = Solver::with_fallback(FallbackPolicy::First);

    if middle.classify(&board) == Position::N {
        assert_eq!(middle.best_move(&board), first.best_move(&board));
    } else {
        let legal = board.legal_moves();
        assert_eq!(first.best_move(&board), legal.first().copied());
        assert_eq!(middle.best_move(&board), legal.get(legal.len() / 2).copied());
    }
}

// ============================================================================
// SERVER STATE TESTS
// ============================================================================

#[test]
fn test_server_reuses_injected_solver() {
    let mut solver = Solver::new();
    solver.opening_outcome(30);
    let warm = solver.classifier().cache_len();

    let state = Arc::new(ServerState::with_solver(solver));
    assert_eq!(state.solver().classifier().cache_len(), warm);

    // Router construction must not reset shared state
    let _router = create_router(&ServerConfig::default(), Arc::clone(&state));
    assert_eq!(state.solver().classifier().cache_len(), warm);
    assert!(state.game().is_none());
}
