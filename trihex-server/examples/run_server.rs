//! Run the TRIHEX server standalone
//!
//! Run with: cargo run -p trihex-server --example run_server

use tracing_subscriber::EnvFilter;
use trihex_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::default();

    println!("Starting TRIHEX server on port {}", config.port);
    println!("Try: curl http://localhost:{}/api/status", config.port);

    run_server(config).await
}
