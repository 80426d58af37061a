//! AI endpoints, answered by the search worker

use crate::error::ApiError;
use crate::state::ServerState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use trihex_core::{MoveRequest, MoveResponse, RemovalRequest, RemovalResponse};
use trihex_worker::WorkerError;

/// Choose a move for the acting player
pub async fn choose_move(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let difficulty = req.difficulty;
    let result = state.worker.choose_move(req).await;
    tally(&state, &result);
    let response = result?;
    tracing::info!("{} move: {:?}", difficulty, response);
    state.count(|c| c.moves += 1);
    Ok(Json(response))
}

/// Choose which surrounded tile to remove
pub async fn choose_removal(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<RemovalRequest>,
) -> Result<Json<RemovalResponse>, ApiError> {
    let result = state.worker.choose_removal(req).await;
    tally(&state, &result);
    let response = result?;
    state.count(|c| c.removals += 1);
    Ok(Json(response))
}

/// Cancel the running search and anything queued
pub async fn cancel(State(state): State<Arc<ServerState>>) -> Json<Value> {
    state.worker.cancel();
    Json(json!({ "success": true }))
}

fn tally<T>(state: &ServerState, result: &Result<T, WorkerError>) {
    match result {
        Err(WorkerError::Cancelled) => state.count(|c| c.cancelled += 1),
        Err(WorkerError::Snapshot(_)) => state.count(|c| c.rejected += 1),
        _ => {}
    }
}
