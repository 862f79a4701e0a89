//! Serve command - start the HTTP API
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), warm_up_solver(), start_server()
//! - Level 3: (delegated to kayles-server crate)
//! - Level 4: configuration validation

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{ensure, Result};
use clap::Args;

use kayles_core::{Classifier, FallbackPolicy, Solver, MAX_PINS};
use kayles_server::{serve, ServerConfig, ServerState, DEFAULT_STATE_LIMIT};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// Directory with static files for a browser front end
    #[arg(long, default_value = "web")]
    pub static_dir: PathBuf,

    /// Solve every full row up to this many pins before accepting requests
    #[arg(long, default_value = "0")]
    pub warm_up: usize,

    /// Cached states the solver may hold before requests get 503
    #[arg(long, default_value_t = DEFAULT_STATE_LIMIT)]
    pub state_limit: usize,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run serve command
///
/// 1. Validate configuration
/// 2. Optionally fill the solver cache
/// 3. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;
    let solver = warm_up_solver(args.warm_up, args.state_limit);

    tracing::info!("Starting KAYLES API server on port {}", config.port);

    start_server(config, ServerState::with_solver(solver))
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;
    ensure!(
        args.warm_up <= MAX_PINS,
        "--warm-up cannot exceed {} pins",
        MAX_PINS
    );
    ensure!(args.state_limit > 0, "--state-limit must be positive");

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    })
}

/// Classify full rows up to `pins` so the first requests are answered from cache
fn warm_up_solver(pins: usize, state_limit: usize) -> Solver {
    let classifier = Classifier::with_state_limit(state_limit);
    let mut solver = Solver::with_classifier(classifier, FallbackPolicy::default());
    if pins == 0 {
        return solver;
    }

    let start = Instant::now();
    for n in 0..=pins {
        if let Err(err) = solver.try_opening_outcome(n) {
            tracing::warn!("Warm-up stopped at {} pins: {}", n, err);
            break;
        }
    }
    tracing::info!(
        "Warmed up rows of 0..={} pins: {} states in {:.2}s",
        pins,
        solver.classifier().cache_len(),
        start.elapsed().as_secs_f64()
    );
    solver
}

/// Start the server (blocking)
fn start_server(config: ServerConfig, state: ServerState) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(config, Arc::new(state)))
}

// ============================================================================
// LEVEL 4 - VALIDATION
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. API routes still work.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
