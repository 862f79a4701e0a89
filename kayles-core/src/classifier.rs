//! Exact P/N classification under the misère convention
//!
//! The recursion is the usual impartial-game rule: a state is N if some
//! child is P, and P if every child is N. The misère twist lives entirely in
//! the base case: a player facing the terminal state cannot move and so wins,
//! which makes the terminal state N.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::Board;
use crate::error::KaylesError;
use crate::state::CanonicalState;

/// Outcome class of a position for the player about to move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// Previous player wins: the mover loses against optimal play
    P,
    /// Next player wins: the mover can force a win
    N,
}

impl Position {
    pub fn from_is_p(is_p: bool) -> Self {
        if is_p {
            Position::P
        } else {
            Position::N
        }
    }

    pub fn is_p(self) -> bool {
        self == Position::P
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::P => f.write_str("P"),
            Position::N => f.write_str("N"),
        }
    }
}

/// Cache counters, reset together with the cache
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassifierStats {
    /// Calls into the memoized recursion
    pub lookups: u64,
    /// Lookups answered from the cache
    pub hits: u64,
    /// States classified from scratch
    pub computed: u64,
}

/// Memoized classifier; one cache per instance
///
/// An optional state limit caps the cache for the checked entry points
/// ([`Classifier::try_is_p`] and the `try_*` methods of the solver).
#[derive(Clone, Debug, Default)]
pub struct Classifier {
    memo: FxHashMap<CanonicalState, bool>,
    stats: ClassifierStats,
    state_limit: Option<usize>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier whose checked lookups fail once `limit` states are cached
    pub fn with_state_limit(limit: usize) -> Self {
        Self {
            state_limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn state_limit(&self) -> Option<usize> {
        self.state_limit
    }

    pub fn set_state_limit(&mut self, limit: Option<usize>) {
        self.state_limit = limit;
    }

    /// Whether `state` is a P-position
    ///
    /// Always runs to completion; the state limit is not consulted.
    pub fn is_p(&mut self, state: &CanonicalState) -> bool {
        match self.solve(state, None) {
            Ok(is_p) => is_p,
            Err(err) => unreachable!("unbounded search failed: {err}"),
        }
    }

    /// Whether `state` is a P-position, within the state limit
    ///
    /// When the cache would grow past the limit the whole cache is dropped
    /// and [`KaylesError::StateLimitExceeded`] is returned, so later smaller
    /// queries start from an empty cache instead of failing too.
    pub fn try_is_p(&mut self, state: &CanonicalState) -> Result<bool, KaylesError> {
        let result = self.solve(state, self.state_limit);
        if let Err(KaylesError::StateLimitExceeded { limit }) = result {
            tracing::warn!(state = %state, limit, "state limit reached, dropping cache");
            self.clear();
        }
        result
    }

    fn solve(
        &mut self,
        state: &CanonicalState,
        limit: Option<usize>,
    ) -> Result<bool, KaylesError> {
        self.stats.lookups += 1;
        if let Some(&cached) = self.memo.get(state) {
            self.stats.hits += 1;
            return Ok(cached);
        }

        // Terminal: no move for the mover, who therefore wins
        let mut is_p = !state.is_terminal();
        for child in state.children() {
            if self.solve(&child, limit)? {
                is_p = false;
                break;
            }
        }

        if let Some(limit) = limit {
            if self.memo.len() >= limit {
                return Err(KaylesError::StateLimitExceeded { limit });
            }
        }
        self.stats.computed += 1;
        tracing::trace!(state = %state, is_p, "classified");
        self.memo.insert(state.clone(), is_p);
        Ok(is_p)
    }

    pub fn classify(&mut self, state: &CanonicalState) -> Position {
        Position::from_is_p(self.is_p(state))
    }

    /// Classify explicit run lengths, rejecting runs shorter than two
    pub fn is_p_runs(&mut self, runs: &[u32]) -> Result<bool, KaylesError> {
        let state = CanonicalState::from_runs(runs)?;
        Ok(self.is_p(&state))
    }

    pub fn is_p_board(&mut self, board: &Board) -> bool {
        self.is_p(&CanonicalState::from_board(board))
    }

    pub fn try_is_p_board(&mut self, board: &Board) -> Result<bool, KaylesError> {
        self.try_is_p(&CanonicalState::from_board(board))
    }

    /// Cached verdict, if this state has been classified
    pub fn cached(&self, state: &CanonicalState) -> Option<bool> {
        self.memo.get(state).copied()
    }

    pub fn cache_len(&self) -> usize {
        self.memo.len()
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }

    /// Drop every cached verdict
    pub fn clear(&mut self) {
        self.memo.clear();
        self.stats = ClassifierStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_is_n() {
        let mut classifier = Classifier::new();
        assert!(!classifier.is_p(&CanonicalState::empty()));
        assert_eq!(classifier.classify(&CanonicalState::empty()), Position::N);
    }

    #[test]
    fn test_small_single_runs() {
        let mut classifier = Classifier::new();
        // Two or three pins: the only move hands the opponent an empty row
        assert_eq!(classifier.is_p_runs(&[2]), Ok(true));
        assert_eq!(classifier.is_p_runs(&[3]), Ok(true));
        // Four pins: take the end pair, leaving [2] to the opponent
        assert_eq!(classifier.is_p_runs(&[4]), Ok(false));
        assert_eq!(classifier.is_p_runs(&[5]), Ok(false));
    }

    #[test]
    fn test_rejects_short_runs() {
        let mut classifier = Classifier::new();
        assert_eq!(
            classifier.is_p_runs(&[4, 1]),
            Err(KaylesError::InvalidRun { length: 1 })
        );
        assert_eq!(classifier.cache_len(), 0);
    }

    #[test]
    fn test_run_order_is_irrelevant() {
        let mut classifier = Classifier::new();
        let a = classifier.is_p_runs(&[2, 7, 4]).unwrap();
        let b = classifier.is_p_runs(&[7, 4, 2]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_repeat_lookups_hit_cache() {
        let mut classifier = Classifier::new();
        let state = CanonicalState::from_runs(&[9]).unwrap();
        let first = classifier.is_p(&state);
        let computed = classifier.stats().computed;
        let size = classifier.cache_len();

        for _ in 0..10 {
            assert_eq!(classifier.is_p(&state), first);
        }
        assert_eq!(classifier.stats().computed, computed);
        assert_eq!(classifier.cache_len(), size);
        assert!(classifier.stats().hits >= 10);
    }

    #[test]
    fn test_cache_is_not_corrupted_by_other_states() {
        let mut classifier = Classifier::new();
        let small = CanonicalState::from_runs(&[6, 2]).unwrap();
        let verdict = classifier.is_p(&small);

        classifier.is_p(&CanonicalState::from_runs(&[14, 5]).unwrap());
        classifier.is_p(&CanonicalState::from_runs(&[20]).unwrap());

        assert_eq!(classifier.cached(&small), Some(verdict));
        assert_eq!(Classifier::new().is_p(&small), verdict);
    }

    #[test]
    fn test_instances_do_not_share_cache() {
        let mut a = Classifier::new();
        let b = Classifier::new();
        a.is_p_runs(&[10]).unwrap();
        assert!(a.cache_len() > 0);
        assert_eq!(b.cache_len(), 0);

        a.clear();
        assert_eq!(a.cache_len(), 0);
        assert_eq!(a.stats(), ClassifierStats::default());
    }

    #[test]
    fn test_state_limit_stops_large_solves() {
        let mut classifier = Classifier::with_state_limit(20);
        let large = CanonicalState::from_runs(&[40]).unwrap();

        assert_eq!(
            classifier.try_is_p(&large),
            Err(KaylesError::StateLimitExceeded { limit: 20 })
        );
        assert_eq!(classifier.cache_len(), 0);

        // Small positions still fit after the cache was dropped
        let small = CanonicalState::from_runs(&[4]).unwrap();
        assert_eq!(classifier.try_is_p(&small), Ok(false));
        assert!(classifier.cache_len() <= 20);
    }

    #[test]
    fn test_state_limit_never_exceeded() {
        let mut limited = Classifier::with_state_limit(200);
        let mut unlimited = Classifier::new();
        for n in 2..=30 {
            let state = CanonicalState::from_runs(&[n]).unwrap();
            match limited.try_is_p(&state) {
                Ok(is_p) => assert_eq!(is_p, unlimited.is_p(&state)),
                Err(err) => assert_eq!(err, KaylesError::StateLimitExceeded { limit: 200 }),
            }
            assert!(limited.cache_len() <= 200);
        }
    }

    #[test]
    fn test_unchecked_lookup_ignores_state_limit() {
        let mut classifier = Classifier::with_state_limit(3);
        let state = CanonicalState::from_runs(&[20]).unwrap();
        assert_eq!(classifier.is_p(&state), Classifier::new().is_p(&state));
        assert!(classifier.cache_len() > 3);
    }
}
