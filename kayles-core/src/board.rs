//! Pin row representation and move generation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KaylesError;

/// A legal move: remove the pin at `index` and its right neighbour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub index: usize,
}

impl Move {
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    /// The two pin indices removed by this move
    pub fn pins(&self) -> (usize, usize) {
        (self.index, self.index + 1)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.index, self.index + 1)
    }
}

/// A row of pins, each either standing (alive) or knocked down
///
/// Serialized as an array of `0`/`1` integers. Constructing a board from
/// anything other than `0` or `1` is rejected rather than coerced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Board {
    cells: Vec<bool>,
}

impl Board {
    /// All pins standing
    pub fn full(len: usize) -> Self {
        Self {
            cells: vec![true; len],
        }
    }

    pub fn from_alive(cells: Vec<bool>) -> Self {
        Self { cells }
    }

    /// Build from `0`/`1` values
    pub fn from_cells(values: &[u8]) -> Result<Self, KaylesError> {
        let cells = values
            .iter()
            .enumerate()
            .map(|(index, &value)| match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(KaylesError::InvalidCell { index, value }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_alive(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    pub fn alive_count(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterate legal moves in board order
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.cells
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0] && pair[1])
            .map(|(index, _)| Move::new(index))
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.moves().collect()
    }

    pub fn has_moves(&self) -> bool {
        self.moves().next().is_some()
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.is_alive(mv.index) && self.is_alive(mv.index + 1)
    }

    /// Return a copy with the move applied
    ///
    /// # Panics
    ///
    /// Panics if `mv.index + 1` is outside the board. Use
    /// [`Board::try_apply`] for moves that have not been checked.
    pub fn apply(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.remove_pair(mv);
        next
    }

    /// Apply a move that may be illegal
    pub fn try_apply(&self, mv: Move) -> Result<Board, KaylesError> {
        let len = self.len();
        if mv.index >= len {
            return Err(KaylesError::PinOutOfRange { index: mv.index, len });
        }
        let (a, b) = mv.pins();
        if b >= len {
            return Err(KaylesError::PinOutOfRange { index: b, len });
        }
        if let Some(&index) = [a, b].iter().find(|&&i| !self.cells[i]) {
            return Err(KaylesError::PinRemoved { index });
        }
        Ok(self.apply(mv))
    }

    /// Knock down both pins of the move in place
    ///
    /// # Panics
    ///
    /// Panics if `mv.index + 1` is outside the board.
    pub fn remove_pair(&mut self, mv: Move) {
        debug_assert!(self.is_legal(mv), "illegal move {mv} on {self}");
        self.cells[mv.index] = false;
        self.cells[mv.index + 1] = false;
    }

    /// Lengths of every maximal run of standing pins, left to right
    pub fn runs(&self) -> Vec<u32> {
        runs(&self.cells)
    }
}

/// Lengths of the maximal runs of `true` cells, left to right
pub fn runs(cells: &[bool]) -> Vec<u32> {
    let mut runs = Vec::new();
    let mut current = 0u32;
    for &alive in cells {
        if alive {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    if current > 0 {
        runs.push(current);
    }
    runs
}

impl TryFrom<Vec<u8>> for Board {
    type Error = KaylesError;

    fn try_from(values: Vec<u8>) -> Result<Self, Self::Error> {
        Board::from_cells(&values)
    }
}

impl From<Board> for Vec<u8> {
    fn from(board: Board) -> Self {
        board.cells.into_iter().map(u8::from).collect()
    }
}

impl FromStr for Board {
    type Err = KaylesError;

    /// Parse `1`/`|` as standing and `0`/`.`/`x` as removed; whitespace is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(index, c)| match c {
                '1' | '|' => Ok(true),
                '0' | '.' | 'x' | 'X' => Ok(false),
                other => Err(KaylesError::InvalidBoardChar { index, found: other }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &alive in &self.cells {
            f.write_str(if alive { "1" } else { "0" })?;
        }
        Ok(())
    }
}
