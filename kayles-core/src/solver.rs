//! Move selection on top of the classifier

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::{Board, Move};
use crate::classifier::{Classifier, Position};
use crate::error::KaylesError;
use crate::state::CanonicalState;

// ============================================================================
// FALLBACK POLICY
// ============================================================================

/// Which legal move to play when no winning move exists
///
/// The choice carries no game-theoretic meaning: every move from a
/// P-position loses against perfect play.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    First,
    #[default]
    Middle,
    Last,
}

impl FallbackPolicy {
    fn pick(self, legal: &[Move]) -> Option<Move> {
        match self {
            FallbackPolicy::First => legal.first().copied(),
            FallbackPolicy::Middle => legal.get(legal.len() / 2).copied(),
            FallbackPolicy::Last => legal.last().copied(),
        }
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Who wins a fresh row of pins with perfect play
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    FirstPlayerWins,
    SecondPlayerWins,
}

impl Outcome {
    pub fn from_position(position: Position) -> Self {
        match position {
            Position::N => Outcome::FirstPlayerWins,
            Position::P => Outcome::SecondPlayerWins,
        }
    }

    pub fn position(self) -> Position {
        match self {
            Outcome::FirstPlayerWins => Position::N,
            Outcome::SecondPlayerWins => Position::P,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::FirstPlayerWins => f.write_str("first player wins (N)"),
            Outcome::SecondPlayerWins => f.write_str("second player wins (P)"),
        }
    }
}

/// Everything the solver knows about one board
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub state: CanonicalState,
    pub position: Position,
    pub best_move: Option<Move>,
    /// Number of legal moves that lead to a P-position
    pub winning_moves: usize,
    pub legal_moves: usize,
}

// ============================================================================
// SOLVER
// ============================================================================

/// Exact player: a classifier plus a fallback policy
#[derive(Clone, Debug, Default)]
pub struct Solver {
    classifier: Classifier,
    fallback: FallbackPolicy,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback(fallback: FallbackPolicy) -> Self {
        Self {
            classifier: Classifier::new(),
            fallback,
        }
    }

    /// Reuse an existing (possibly warm) classifier
    pub fn with_classifier(classifier: Classifier, fallback: FallbackPolicy) -> Self {
        Self {
            classifier,
            fallback,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut Classifier {
        &mut self.classifier
    }

    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    pub fn is_p(&mut self, board: &Board) -> bool {
        self.classifier.is_p_board(board)
    }

    pub fn classify(&mut self, board: &Board) -> Position {
        Position::from_is_p(self.is_p(board))
    }

    /// True when the mover cannot win against optimal play
    pub fn is_losing(&mut self, board: &Board) -> bool {
        board.has_moves() && self.is_p(board)
    }

    /// Recommended move, or `None` when the board has no legal move
    ///
    /// From an N-position the result is the first move (in board order) into
    /// a P-position. From a P-position it is the fallback move and should not
    /// be assumed optimal.
    pub fn best_move(&mut self, board: &Board) -> Option<Move> {
        let legal = board.legal_moves();
        if legal.is_empty() {
            return None;
        }

        if !self.is_p(board) {
            if let Some(mv) = legal
                .iter()
                .copied()
                .find(|&mv| self.is_p(&board.apply(mv)))
            {
                tracing::debug!(board = %board, mv = %mv, "winning move");
                return Some(mv);
            }
        }
        self.fallback_move(board, &legal)
    }

    // ------------------------------------------------------------------------
    // Checked variants: respect the classifier's state limit
    // ------------------------------------------------------------------------

    pub fn try_is_p(&mut self, board: &Board) -> Result<bool, KaylesError> {
        self.classifier.try_is_p_board(board)
    }

    pub fn try_classify(&mut self, board: &Board) -> Result<Position, KaylesError> {
        self.try_is_p(board).map(Position::from_is_p)
    }

    /// [`Solver::best_move`] that fails instead of outgrowing the state limit
    pub fn try_best_move(&mut self, board: &Board) -> Result<Option<Move>, KaylesError> {
        let legal = board.legal_moves();
        if legal.is_empty() {
            return Ok(None);
        }

        if !self.try_is_p(board)? {
            for &mv in &legal {
                if self.try_is_p(&board.apply(mv))? {
                    tracing::debug!(board = %board, mv = %mv, "winning move");
                    return Ok(Some(mv));
                }
            }
        }
        Ok(self.fallback_move(board, &legal))
    }

    pub fn try_opening_outcome(&mut self, pins: usize) -> Result<Outcome, KaylesError> {
        self.try_classify(&Board::full(pins)).map(Outcome::from_position)
    }

    fn fallback_move(&self, board: &Board, legal: &[Move]) -> Option<Move> {
        let mv = self.fallback.pick(legal);
        tracing::debug!(
            board = %board,
            mv = ?mv,
            policy = ?self.fallback,
            "no winning move, falling back"
        );
        mv
    }

    /// Every legal move that leaves the opponent in a P-position
    pub fn winning_moves(&mut self, board: &Board) -> Vec<Move> {
        board
            .legal_moves()
            .into_iter()
            .filter(|&mv| self.is_p(&board.apply(mv)))
            .collect()
    }

    pub fn analyze(&mut self, board: &Board) -> Analysis {
        let state = CanonicalState::from_board(board);
        let position = self.classifier.classify(&state);
        let winning_moves = self.winning_moves(board).len();
        Analysis {
            state,
            position,
            best_move: self.best_move(board),
            winning_moves,
            legal_moves: board.legal_moves().len(),
        }
    }

    /// Perfect-play verdict for a full row of `pins`
    pub fn opening_outcome(&mut self, pins: usize) -> Outcome {
        Outcome::from_position(self.classify(&Board::full(pins)))
    }

    /// Let the solver play both sides until no move is left
    pub fn play_out(&mut self, initial: &Board) -> (Board, Vec<Move>) {
        let mut board = initial.clone();
        let mut history = Vec::new();
        while let Some(mv) = self.best_move(&board) {
            board.remove_pair(mv);
            history.push(mv);
        }
        (board, history)
    }
}

// ============================================================================
// TESTS
// ============================================================================
