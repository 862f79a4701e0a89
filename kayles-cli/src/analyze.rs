//! Classify and best-move commands - query the solver about one board

use anyhow::{ensure, Context, Result};
use clap::Args;

use kayles_core::{Board, Position, Solver, MAX_PINS};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Board as a string of 1 (standing) and 0 (removed), e.g. 1101111
    #[arg(long)]
    pub board: String,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

impl AnalyzeArgs {
    fn parse_board(&self) -> Result<Board> {
        let board: Board = self
            .board
            .parse()
            .with_context(|| format!("Invalid board: {}", self.board))?;
        ensure!(
            board.len() <= MAX_PINS,
            "board has {} pins, at most {} are supported",
            board.len(),
            MAX_PINS
        );
        Ok(board)
    }
}

/// Print the canonical state and its P/N class
pub fn run_classify(args: AnalyzeArgs) -> Result<()> {
    let board = args.parse_board()?;
    let mut solver = Solver::new();
    let analysis = solver.analyze(&board);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("Board:    {board}");
    println!("State:    {}", analysis.state);
    println!("Position: {}", describe(analysis.position, analysis.legal_moves));
    Ok(())
}

/// Print the recommended move
pub fn run_best_move(args: AnalyzeArgs) -> Result<()> {
    let board = args.parse_board()?;
    let mut solver = Solver::new();
    let analysis = solver.analyze(&board);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    match analysis.best_move {
        None => println!("No legal move: the player to move wins"),
        Some(mv) => {
            println!("Move:     remove pins {mv}");
            println!("Result:   {}", board.apply(mv));
            if analysis.position == Position::N {
                println!(
                    "Winning:  yes ({} of {} moves win)",
                    analysis.winning_moves, analysis.legal_moves
                );
            } else {
                println!("Winning:  no (every move loses against perfect play)");
            }
        }
    }
    Ok(())
}

fn describe(position: Position, legal_moves: usize) -> &'static str {
    match (position, legal_moves) {
        (Position::N, 0) => "N (no moves left, the player to move wins)",
        (Position::N, _) => "N (the player to move can force a win)",
        (Position::P, _) => "P (the player to move loses against perfect play)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(board: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            board: board.to_string(),
            json: false,
        }
    }

    #[test]
    fn test_parse_board() {
        assert_eq!(args("1101").parse_board().unwrap().to_string(), "1101");
        assert!(args("11z1").parse_board().is_err());
        assert!(args(&"1".repeat(MAX_PINS + 1)).parse_board().is_err());
    }

    #[test]
    fn test_describe_terminal() {
        assert!(describe(Position::N, 0).contains("no moves"));
    }
}
