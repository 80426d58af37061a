//! Server command - start the HTTP server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to trihex-server crate)

use anyhow::Result;
use clap::Args;

use trihex_core::EngineConfig;
use trihex_server::{run_server, ServerConfig};
use trihex_worker::WorkerConfig;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs, engine: EngineConfig, seed: Option<u64>) -> Result<()> {
    let config = configure_server(&args, engine, seed);

    tracing::info!("Starting TRIHEX server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs, engine: EngineConfig, seed: Option<u64>) -> ServerConfig {
    ServerConfig {
        port: args.port,
        worker: WorkerConfig { engine, seed },
    }
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    // Create tokio runtime for async server
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configure_server() {
        let args = ServerArgs { port: 9100 };
        let config = configure_server(&args, EngineConfig::default(), Some(4));
        assert_eq!(config.port, 9100);
        assert_eq!(config.worker.seed, Some(4));
    }
}
