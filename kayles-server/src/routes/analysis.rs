//! Board queries: P/N classification and the recommended move

use super::blocking;
use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use kayles_core::{Board, CanonicalState, Move, Position, MAX_PINS};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct BoardRequest {
    /// Pins as `0`/`1`
    pub board: Vec<u8>,
}

impl BoardRequest {
    fn to_board(&self) -> Result<Board, ApiError> {
        if self.board.len() > MAX_PINS {
            return Err(ApiError::BadRequest(format!(
                "board has {} pins, at most {} are supported",
                self.board.len(),
                MAX_PINS
            )));
        }
        Ok(Board::from_cells(&self.board)?)
    }
}

#[derive(Serialize)]
pub struct ClassifyResponse {
    pub state: CanonicalState,
    pub position: Position,
    pub is_p: bool,
}

#[derive(Serialize)]
pub struct BestMoveResponse {
    #[serde(rename = "move")]
    pub mv: Option<Move>,
    pub pins: Option<[usize; 2]>,
    pub position: Position,
    /// Whether the move is a forced win for the mover
    pub winning: bool,
}

/// Classify an arbitrary board
pub async fn classify(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<BoardRequest>,
) -> Result<Json<ClassifyResponse>, ApiError> {
    let board = req.to_board()?;
    let canonical = CanonicalState::from_board(&board);

    let response = blocking(move || {
        let is_p = state.solver().classifier_mut().try_is_p(&canonical)?;
        Ok(ClassifyResponse {
            state: canonical,
            position: Position::from_is_p(is_p),
            is_p,
        })
    })
    .await?;
    Ok(Json(response))
}

/// Recommend a move for the side to move
pub async fn best_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<BoardRequest>,
) -> Result<Json<BestMoveResponse>, ApiError> {
    let board = req.to_board()?;

    let response = blocking(move || {
        let mut solver = state.solver();
        let position = solver.try_classify(&board)?;
        let mv = solver.try_best_move(&board)?;
        Ok(BestMoveResponse {
            mv,
            pins: mv.map(|mv| [mv.index, mv.index + 1]),
            position,
            winning: mv.is_some() && position == Position::N,
        })
    })
    .await?;
    Ok(Json(response))
}
