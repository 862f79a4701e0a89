//! KAYLES Server - HTTP API for the Kayles solver
//!
//! This crate provides the web backend:
//! - Opening badge (who wins a fresh row)
//! - Classification and best-move queries for arbitrary boards
//! - A single interactive human-vs-AI game
//! - Static file serving for a front end

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub use error::ApiError;
pub use state::{ServerState, DEFAULT_STATE_LIMIT};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8002,
            static_dir: "web".to_string(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Opening badge
        .route("/api/outcome/:pins", get(routes::outcome::get_outcome))
        // Board queries
        .route("/api/classify", post(routes::analysis::classify))
        .route("/api/best-move", post(routes::analysis::best_move))
        // Game API
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/start", post(routes::game::start_game))
        .route("/api/game/move", post(routes::game::make_player_move))
        .route("/api/game/ai-move", post(routes::game::make_ai_move))
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Start the HTTP server with a fresh solver
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    serve(config, Arc::new(ServerState::new())).await
}

/// Start the HTTP server on existing state
pub async fn serve(config: ServerConfig, state: Arc<ServerState>) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let router = create_router(&config, state);

    tracing::info!("KAYLES Server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
