//! Snapshot analysis: legal moves and scores, no search involved

use crate::error::ApiError;
use axum::Json;
use serde::{Deserialize, Serialize};
use trihex_core::protocol::board_from_snapshots;
use trihex_core::{
    all_possible_moves, scores, FrontierCache, MoveRequest, MoveResponse, TileSnapshot,
};

#[derive(Serialize)]
pub struct LegalMovesResponse {
    pub count: usize,
    pub moves: Vec<MoveResponse>,
}

/// Every legal move for the acting player of a snapshot
pub async fn legal_moves(
    Json(req): Json<MoveRequest>,
) -> Result<Json<LegalMovesResponse>, ApiError> {
    let (position, acting) = req.to_position()?;
    let moves: Vec<MoveResponse> = all_possible_moves(
        &position.board,
        position.hand(acting),
        acting,
        req.mode,
        &mut FrontierCache::new(),
    )
    .into_iter()
    .map(MoveResponse::from)
    .collect();

    Ok(Json(LegalMovesResponse {
        count: moves.len(),
        moves,
    }))
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub board: Vec<TileSnapshot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub player1: u32,
    pub player2: u32,
    pub surrounded: usize,
}

/// Both players' scores for a board snapshot
pub async fn score(Json(req): Json<ScoreRequest>) -> Result<Json<ScoreResponse>, ApiError> {
    let board = board_from_snapshots(&req.board)?;
    let (player1, player2) = scores(&board);
    Ok(Json(ScoreResponse {
        player1,
        player2,
        surrounded: board.surrounded_tiles().len(),
    }))
}
