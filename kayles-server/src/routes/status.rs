//! Status endpoint

use axum::Json;
use kayles_core::MAX_PINS;
use serde::Serialize;

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub engine: &'static str,
    pub max_pins: usize,
}

pub async fn status_handler() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        engine: "exact-dp",
        max_pins: MAX_PINS,
    })
}
