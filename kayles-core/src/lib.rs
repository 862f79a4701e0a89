//! KAYLES Core - Exact solver for misère Dawson's Kayles
//!
//! This crate provides the core logic for octal game 0.07 under the misère
//! convention (the player who cannot move wins):
//! - Pin rows and move generation
//! - Canonical states (sorted run lengths of two or more)
//! - Memoized P/N classification
//! - Move selection with a deterministic fallback
//! - A human-vs-solver game controller

pub mod board;
pub mod state;
pub mod classifier;
pub mod solver;
pub mod game;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Move};
pub use state::{normalize, CanonicalState, MIN_RUN};
pub use classifier::{Classifier, ClassifierStats, Position};
pub use solver::{Analysis, FallbackPolicy, Outcome, Solver};
pub use game::{clamp_pins, Game, GameConfig, GameResult, Side, DEFAULT_PINS, MAX_PINS, MIN_PINS};
pub use error::KaylesError;
