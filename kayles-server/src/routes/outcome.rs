//! Opening badge: who wins a fresh row of pins

use super::blocking;
use crate::error::ApiError;
use crate::state::ServerState;
use axum::{
    extract::{Path, State},
    Json,
};
use kayles_core::{GameConfig, Outcome, Position, Side};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct OutcomeResponse {
    pub pins: usize,
    pub outcome: Outcome,
    pub position: Position,
    pub label: String,
}

/// Classify the all-standing row of `pins`
pub async fn get_outcome(
    State(state): State<Arc<ServerState>>,
    Path(pins): Path<usize>,
) -> Result<Json<OutcomeResponse>, ApiError> {
    GameConfig::new(pins, Side::Human).validate()?;

    let outcome = blocking(move || {
        let mut solver = state.solver();
        Ok(solver.try_opening_outcome(pins)?)
    })
    .await?;
    Ok(Json(OutcomeResponse {
        pins,
        outcome,
        position: outcome.position(),
        label: outcome.to_string(),
    }))
}
