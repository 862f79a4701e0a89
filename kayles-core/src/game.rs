//! Game controller: turn order, move validation and winner declaration

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Board, Move};
use crate::error::KaylesError;
use crate::solver::Solver;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Fewest pins a game may start with
pub const MIN_PINS: usize = 2;

/// Most pins a game may start with
///
/// A cold solve of a full row of 80 takes about a million cached states;
/// the state count grows roughly tenfold every 20 pins beyond that.
pub const MAX_PINS: usize = 80;

/// Pin count used when none is given
pub const DEFAULT_PINS: usize = 60;

/// Clamp a requested pin count into `MIN_PINS..=MAX_PINS`
pub fn clamp_pins(pins: usize) -> usize {
    pins.clamp(MIN_PINS, MAX_PINS)
}

// ============================================================================
// CORE TYPES
// ============================================================================

/// Who is at the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Human,
    Ai,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Human => Side::Ai,
            Side::Ai => Side::Human,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => f.write_str("human"),
            Side::Ai => f.write_str("ai"),
        }
    }
}

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    /// Misère: the side left without a move wins
    Won(Side),
}

/// Starting parameters of a game
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub pins: usize,
    pub first: Side,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pins: DEFAULT_PINS,
            first: Side::Human,
        }
    }
}

impl GameConfig {
    pub fn new(pins: usize, first: Side) -> Self {
        Self { pins, first }
    }

    pub fn validate(&self) -> Result<(), KaylesError> {
        if !(MIN_PINS..=MAX_PINS).contains(&self.pins) {
            return Err(KaylesError::PinCountOutOfRange {
                pins: self.pins,
                min: MIN_PINS,
                max: MAX_PINS,
            });
        }
        Ok(())
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A human-vs-solver game in progress
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Side,
    result: GameResult,
    history: Vec<(Side, Move)>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, KaylesError> {
        config.validate()?;
        Ok(Self::from_board(Board::full(config.pins), config.first))
    }

    /// Resume from an arbitrary position
    pub fn from_board(board: Board, to_move: Side) -> Self {
        let mut game = Self {
            board,
            to_move,
            result: GameResult::Ongoing,
            history: Vec::new(),
        };
        game.check_finished();
        game
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Side {
        self.to_move
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result != GameResult::Ongoing
    }

    pub fn winner(&self) -> Option<Side> {
        match self.result {
            GameResult::Won(side) => Some(side),
            GameResult::Ongoing => None,
        }
    }

    pub fn history(&self) -> &[(Side, Move)] {
        &self.history
    }

    /// Human move given as two pin indices, in either order
    pub fn play_pair(&mut self, a: usize, b: usize) -> Result<Move, KaylesError> {
        self.ensure_turn(Side::Human)?;

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let len = self.board.len();
        if let Some(&index) = [lo, hi].iter().find(|&&i| i >= len) {
            return Err(KaylesError::PinOutOfRange { index, len });
        }
        if hi - lo != 1 {
            return Err(KaylesError::NotAdjacent { a: lo, b: hi });
        }
        if let Some(&index) = [lo, hi].iter().find(|&&i| !self.board.is_alive(i)) {
            return Err(KaylesError::PinRemoved { index });
        }

        let mv = Move::new(lo);
        self.apply(mv);
        Ok(mv)
    }

    /// Let the solver move for the AI side
    pub fn play_ai(&mut self, solver: &mut Solver) -> Result<Move, KaylesError> {
        self.ensure_turn(Side::Ai)?;
        // An ongoing game always has a legal move
        let mv = solver.try_best_move(&self.board)?.ok_or(KaylesError::GameOver)?;
        self.apply(mv);
        Ok(mv)
    }

    fn ensure_turn(&self, side: Side) -> Result<(), KaylesError> {
        if self.is_over() {
            return Err(KaylesError::GameOver);
        }
        if self.to_move != side {
            return Err(KaylesError::NotYourTurn(side));
        }
        Ok(())
    }

    fn apply(&mut self, mv: Move) {
        self.board.remove_pair(mv);
        self.history.push((self.to_move, mv));
        tracing::debug!(side = %self.to_move, mv = %mv, board = %self.board, "move played");
        self.to_move = self.to_move.opponent();
        self.check_finished();
    }

    fn check_finished(&mut self) {
        if !self.board.has_moves() {
            self.result = GameResult::Won(self.to_move);
            tracing::info!(winner = %self.to_move, "game over");
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;

    #[test]
    fn test_config_limits() {
        assert!(GameConfig::default().validate().is_ok());
        assert_eq!(
            GameConfig::new(1, Side::Human).validate(),
            Err(KaylesError::PinCountOutOfRange { pins: 1, min: 2, max: 80 })
        );
        assert!(GameConfig::new(81, Side::Ai).validate().is_err());
        assert!(GameConfig::new(MAX_PINS, Side::Ai).validate().is_ok());
        assert_eq!(clamp_pins(0), 2);
        assert_eq!(clamp_pins(500), 80);
        assert_eq!(clamp_pins(37), 37);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"first":"ai"}"#).unwrap();
        assert_eq!(config, GameConfig::new(DEFAULT_PINS, Side::Ai));
    }

    #[test]
    fn test_human_move_validation() {
        let mut game = Game::new(GameConfig::new(6, Side::Human)).unwrap();
        assert_eq!(
            game.play_pair(1, 3),
            Err(KaylesError::NotAdjacent { a: 1, b: 3 })
        );
        assert_eq!(
            game.play_pair(5, 6),
            Err(KaylesError::PinOutOfRange { index: 6, len: 6 })
        );
        assert_eq!(game.play_pair(3, 2), Ok(Move::new(2)));
        assert_eq!(game.board().to_string(), "110011");
        assert_eq!(game.to_move(), Side::Ai);
        assert_eq!(game.play_pair(0, 1), Err(KaylesError::NotYourTurn(Side::Human)));
    }

    #[test]
    fn test_removed_pin_rejected() {
        let mut game = Game::from_board("110111".parse().unwrap(), Side::Human);
        assert_eq!(game.play_pair(1, 2), Err(KaylesError::PinRemoved { index: 2 }));
    }

    #[test]
    fn test_side_without_moves_wins() {
        // Three pins: whoever moves leaves a single pin and the opponent wins
        let mut game = Game::new(GameConfig::new(3, Side::Human)).unwrap();
        game.play_pair(0, 1).unwrap();
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Side::Ai));
        assert_eq!(game.play_pair(1, 2), Err(KaylesError::GameOver));
    }

    #[test]
    fn test_dead_position_is_over_immediately() {
        let game = Game::from_board("1010".parse().unwrap(), Side::Ai);
        assert_eq!(game.result(), GameResult::Won(Side::Ai));
    }

    #[test]
    fn test_ai_wins_from_n_position() {
        let mut solver = Solver::new();
        let mut game = Game::new(GameConfig::new(20, Side::Ai)).unwrap();
        assert!(!solver.is_p(game.board()));

        while !game.is_over() {
            match game.to_move() {
                Side::Ai => {
                    game.play_ai(&mut solver).unwrap();
                }
                Side::Human => {
                    let mv = game.board().legal_moves()[0];
                    let (a, b) = mv.pins();
                    game.play_pair(a, b).unwrap();
                }
            }
        }
        assert_eq!(game.winner(), Some(Side::Ai));
        assert!(game.history().len() >= 2);
    }

    #[test]
    fn test_ai_refuses_out_of_turn() {
        let mut solver = Solver::new();
        let mut game = Game::new(GameConfig::new(10, Side::Human)).unwrap();
        assert_eq!(
            game.play_ai(&mut solver),
            Err(KaylesError::NotYourTurn(Side::Ai))
        );
    }

    #[test]
    fn test_ai_move_over_state_limit_leaves_game_untouched() {
        let classifier = Classifier::with_state_limit(5);
        let mut solver = Solver::with_classifier(classifier, Default::default());
        let mut game = Game::new(GameConfig::new(30, Side::Ai)).unwrap();

        assert_eq!(
            game.play_ai(&mut solver),
            Err(KaylesError::StateLimitExceeded { limit: 5 })
        );
        assert_eq!(game.board(), &Board::full(30));
        assert!(game.history().is_empty());
        assert_eq!(game.to_move(), Side::Ai);
    }
}
