//! Scoring and position evaluation

use crate::board::Board;
use crate::hex::{opposite_edge, Hex};
use crate::tile::{Edge, Player};
use serde::{Deserialize, Serialize};

/// Evaluation constants
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Charged to the second mover when the board is empty
    pub empty_board_penalty: i32,
    /// Added (or subtracted) when a search line empties a hand
    pub hand_exhaustion_bonus: i32,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            empty_board_penalty: 1000,
            hand_exhaustion_bonus: 1000,
        }
    }
}

/// A pair of facing triangle edges between two tiles of one player
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeMatch {
    pub from: Hex,
    pub to: Hex,
    /// Edge index on `from`
    pub edge: usize,
}

fn triangle_pair(board: &Board, at: Hex, edge: usize, n: Hex) -> bool {
    match (board.get(at), board.get(n)) {
        (Some(a), Some(b)) => {
            a.owner == b.owner
                && a.edge(edge) == Edge::Triangle
                && b.edge(opposite_edge(edge)) == Edge::Triangle
        }
        _ => false,
    }
}

/// Points for `player`: one per adjacent own-tile pair with facing triangles
pub fn score(board: &Board, player: Player) -> u32 {
    let mut raw = 0;
    for (at, tile) in board.tiles() {
        if tile.owner != player {
            continue;
        }
        for (edge, n) in at.neighbors() {
            if triangle_pair(board, at, edge, n) {
                raw += 1;
            }
        }
    }
    // Every pair was seen from both sides
    raw / 2
}

/// (player one, player two)
pub fn scores(board: &Board) -> (u32, u32) {
    (score(board, Player::One), score(board, Player::Two))
}

/// `score(player) - score(opponent)`
pub fn score_differential(board: &Board, player: Player) -> i32 {
    score(board, player) as i32 - score(board, player.opponent()) as i32
}

/// Connections made by the tile on `at` alone, with the matched edges
pub fn placement_delta(board: &Board, at: Hex) -> (u32, Vec<EdgeMatch>) {
    let matches: Vec<EdgeMatch> = at
        .neighbors()
        .filter(|&(edge, n)| triangle_pair(board, at, edge, n))
        .map(|(edge, to)| EdgeMatch { from: at, to, edge })
        .collect();
    (matches.len() as u32, matches)
}

/// Evaluate the board from `perspective`
pub fn evaluate(board: &Board, perspective: Player, config: &EvalConfig) -> i32 {
    if board.is_empty() {
        // Nothing on the board yet: the second mover starts behind
        return match perspective {
            Player::One => 0,
            Player::Two => -config.empty_board_penalty,
        };
    }
    score_differential(board, perspective)
}
