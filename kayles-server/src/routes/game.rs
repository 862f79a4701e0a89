//! Game API: one human-vs-AI game at a time

use super::blocking;
use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use kayles_core::{Board, Game, GameConfig, GameResult, Move, Position, Side, Solver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize)]
pub struct HistoryEntry {
    pub side: Side,
    #[serde(rename = "move")]
    pub mv: Move,
}

/// Snapshot of the current game sent after every request
#[derive(Serialize)]
pub struct GameView {
    pub board: Board,
    pub to_move: Side,
    pub result: GameResult,
    pub winner: Option<Side>,
    /// Classification for the side to move, `None` once the game is over
    pub position: Option<Position>,
    pub history: Vec<HistoryEntry>,
}

impl GameView {
    fn new(game: &Game, solver: &mut Solver) -> Result<Self, ApiError> {
        let position = if game.is_over() {
            None
        } else {
            Some(solver.try_classify(game.board())?)
        };
        Ok(Self {
            board: game.board().clone(),
            to_move: game.to_move(),
            result: game.result(),
            winner: game.winner(),
            position,
            history: game
                .history()
                .iter()
                .map(|&(side, mv)| HistoryEntry { side, mv })
                .collect(),
        })
    }
}

#[derive(Deserialize)]
pub struct PlayerMoveRequest {
    pub a: usize,
    pub b: usize,
}

fn no_game() -> ApiError {
    ApiError::NotFound("no game in progress".to_string())
}

/// Current game state
pub async fn get_game(State(state): State<Arc<ServerState>>) -> Result<Json<GameView>, ApiError> {
    let view = blocking(move || {
        let guard = state.game();
        let game = guard.as_ref().ok_or_else(no_game)?;
        let mut solver = state.solver();
        GameView::new(game, &mut solver)
    })
    .await?;
    Ok(Json(view))
}

/// Start a new game, replacing any game in progress
pub async fn start_game(
    State(state): State<Arc<ServerState>>,
    Json(config): Json<GameConfig>,
) -> Result<Json<GameView>, ApiError> {
    let game = Game::new(config)?;
    tracing::info!(pins = config.pins, first = %config.first, "new game");

    let view = blocking(move || {
        let view = GameView::new(&game, &mut state.solver())?;
        *state.game_mut() = Some(game);
        Ok(view)
    })
    .await?;
    Ok(Json(view))
}

/// Apply the human's move
pub async fn make_player_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<PlayerMoveRequest>,
) -> Result<Json<GameView>, ApiError> {
    let view = blocking(move || {
        let mut guard = state.game_mut();
        let game = guard.as_mut().ok_or_else(no_game)?;
        game.play_pair(req.a, req.b)?;
        let mut solver = state.solver();
        GameView::new(game, &mut solver)
    })
    .await?;
    Ok(Json(view))
}

/// Let the solver move for the AI
pub async fn make_ai_move(State(state): State<Arc<ServerState>>) -> Result<Json<GameView>, ApiError> {
    let view = blocking(move || {
        let mut guard = state.game_mut();
        let game = guard.as_mut().ok_or_else(no_game)?;
        let mut solver = state.solver();
        game.play_ai(&mut solver)?;
        GameView::new(game, &mut solver)
    })
    .await?;
    Ok(Json(view))
}
