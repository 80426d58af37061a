//! TRIHEX Server - HTTP API for game clients
//!
//! This crate exposes the engine to a browser or any other client:
//! - AI move and removal selection through the search worker
//! - Legal move listing and scoring for a snapshot
//! - Status and search counters

mod error;
mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use trihex_worker::WorkerConfig;

pub use error::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub worker: WorkerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8003,
            worker: WorkerConfig::default(),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/status", get(routes::status::status_handler))
        // AI
        .route("/api/ai/move", post(routes::ai::choose_move))
        .route("/api/ai/removal", post(routes::ai::choose_removal))
        .route("/api/ai/cancel", post(routes::ai::cancel))
        // Analysis
        .route("/api/moves", post(routes::analysis::legal_moves))
        .route("/api/score", post(routes::analysis::score))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.worker)?);
    let router = create_router(state);

    tracing::info!("TRIHEX Server starting on http://0.0.0.0:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
