//! Canonical game states
//!
//! A board is strategically equivalent to the multiset of its run lengths,
//! ignoring runs shorter than two (no move fits in them). The canonical
//! state is that multiset sorted in descending order; it is also the memo
//! key used by the classifier.

use std::fmt;

use serde::Serialize;

use crate::board::Board;
use crate::error::KaylesError;

/// Smallest run that still admits a move
pub const MIN_RUN: u32 = 2;

/// Sorted (descending) run lengths, every one at least [`MIN_RUN`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CanonicalState(Vec<u32>);

impl CanonicalState {
    /// The terminal state: nothing left to move
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Normalize a board into its canonical state
    pub fn from_board(board: &Board) -> Self {
        let mut runs = board.runs();
        runs.retain(|&len| len >= MIN_RUN);
        runs.sort_unstable_by(|a, b| b.cmp(a));
        Self(runs)
    }

    /// Build from explicit run lengths in any order
    pub fn from_runs(runs: &[u32]) -> Result<Self, KaylesError> {
        if let Some(&length) = runs.iter().find(|&&len| len < MIN_RUN) {
            return Err(KaylesError::InvalidRun { length });
        }
        let mut runs = runs.to_vec();
        runs.sort_unstable_by(|a, b| b.cmp(a));
        Ok(Self(runs))
    }

    pub fn runs(&self) -> &[u32] {
        &self.0
    }

    pub fn is_terminal(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Pins standing in movable runs
    pub fn total_pins(&self) -> u32 {
        self.0.iter().sum()
    }

    /// Every distinct state reachable in one move
    ///
    /// Removing two pins at offset `k` of a run of length `m` leaves runs of
    /// `k` and `m - k - 2`. Offsets `k` and `m - 2 - k` are mirror images, and
    /// equal runs give equal children, so both duplicates are skipped.
    pub fn children(&self) -> Vec<CanonicalState> {
        let mut children = Vec::new();
        for (i, &m) in self.0.iter().enumerate() {
            if i > 0 && self.0[i - 1] == m {
                continue;
            }
            let remaining = m - 2;
            for k in 0..=remaining / 2 {
                children.push(self.split(i, k, remaining - k));
            }
        }
        children
    }

    /// Replace run `i` by the pieces `left` and `right`, keeping the order
    fn split(&self, i: usize, left: u32, right: u32) -> CanonicalState {
        let mut runs = Vec::with_capacity(self.0.len() + 1);
        runs.extend(self.0.iter().enumerate().filter(|&(j, _)| j != i).map(|(_, &len)| len));
        runs.extend([left, right].into_iter().filter(|&len| len >= MIN_RUN));
        runs.sort_unstable_by(|a, b| b.cmp(a));
        CanonicalState(runs)
    }
}

impl fmt::Display for CanonicalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, len) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{len}")?;
        }
        f.write_str("]")
    }
}

/// Normalize a board; shorthand for [`CanonicalState::from_board`]
pub fn normalize(board: &Board) -> CanonicalState {
    CanonicalState::from_board(board)
}
