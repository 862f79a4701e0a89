//! Server state management
//!
//! One solver shared by every request, so its cache stays warm, plus the
//! game currently being played.

use kayles_core::{Classifier, FallbackPolicy, Game, Solver};
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cached states the shared solver may hold before a request is refused
///
/// Comfortably above the million or so states a full row of the largest
/// supported game needs.
pub const DEFAULT_STATE_LIMIT: usize = 4_000_000;

/// Server-wide shared state
pub struct ServerState {
    pub solver: Mutex<Solver>,
    pub current_game: RwLock<Option<Game>>,
}

impl ServerState {
    /// Fresh solver capped at [`DEFAULT_STATE_LIMIT`] cached states
    pub fn new() -> Self {
        let classifier = Classifier::with_state_limit(DEFAULT_STATE_LIMIT);
        Self::with_solver(Solver::with_classifier(classifier, FallbackPolicy::default()))
    }

    /// Start from an existing solver, e.g. one with a warm cache
    pub fn with_solver(solver: Solver) -> Self {
        Self {
            solver: Mutex::new(solver),
            current_game: RwLock::new(None),
        }
    }

    pub fn solver(&self) -> MutexGuard<'_, Solver> {
        self.solver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn game(&self) -> RwLockReadGuard<'_, Option<Game>> {
        self.current_game.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn game_mut(&self) -> RwLockWriteGuard<'_, Option<Game>> {
        self.current_game.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
