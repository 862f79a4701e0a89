//! Example to run the KAYLES server standalone
//!
//! Run with: cargo run -p kayles-server --example run_server

use kayles_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::default();

    println!("Starting KAYLES server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!("Try http://localhost:{}/api/outcome/60", config.port);

    run_server(config).await
}
