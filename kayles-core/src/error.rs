//! Error types for board construction and game play

/// Everything that can go wrong when handing input to the solver or the game
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KaylesError {
    #[error("cell {index} has value {value}, expected 0 or 1")]
    InvalidCell { index: usize, value: u8 },

    #[error("unexpected character {found:?} at position {index}")]
    InvalidBoardChar { index: usize, found: char },

    #[error("run of length {length} cannot appear in a canonical state (minimum is 2)")]
    InvalidRun { length: u32 },

    #[error("pin {index} is outside a board of {len} pins")]
    PinOutOfRange { index: usize, len: usize },

    #[error("pin {index} has already been removed")]
    PinRemoved { index: usize },

    #[error("pins {a} and {b} are not adjacent")]
    NotAdjacent { a: usize, b: usize },

    #[error("it is not the {0} player's turn")]
    NotYourTurn(crate::game::Side),

    #[error("the game is already over")]
    GameOver,

    #[error("pin count {pins} is outside the supported range {min}..={max}")]
    PinCountOutOfRange { pins: usize, min: usize, max: usize },

    #[error("position needs more than {limit} cached states to solve")]
    StateLimitExceeded { limit: usize },
}
