//! Moves and move generation

use crate::board::{Board, FrontierCache};
use crate::hand::Hand;
use crate::hex::Hex;
use crate::rules::{is_frontier_placement_valid, relocation_targets, unique_orientations};
use crate::tile::{Player, TileId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Whether tiles already on the board may relocate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Basic,
    Moving,
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(GameMode::Basic),
            "moving" => Ok(GameMode::Moving),
            other => Err(format!("unknown game mode '{other}' (expected basic or moving)")),
        }
    }
}

/// A legal move
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Move {
    /// Put a tile from hand on the board
    Place { tile: TileId, orientation: u8, to: Hex },
    /// Move (or rotate in place) a tile already on the board
    Relocate {
        tile: TileId,
        orientation: u8,
        from: Hex,
        to: Hex,
    },
}

impl Move {
    pub fn tile(&self) -> TileId {
        match *self {
            Move::Place { tile, .. } | Move::Relocate { tile, .. } => tile,
        }
    }

    pub fn destination(&self) -> Hex {
        match *self {
            Move::Place { to, .. } | Move::Relocate { to, .. } => to,
        }
    }

    pub fn orientation(&self) -> u8 {
        match *self {
            Move::Place { orientation, .. } | Move::Relocate { orientation, .. } => orientation,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Place { tile, orientation, to } => {
                write!(f, "place #{} r{} @ ({}, {})", tile, orientation, to.q, to.r)
            }
            Move::Relocate { tile, orientation, from, to } => write!(
                f,
                "move #{} r{} ({}, {}) -> ({}, {})",
                tile, orientation, from.q, from.r, to.q, to.r
            ),
        }
    }
}

/// Every legal action for `player` holding `hand`
///
/// Placements come first, hand tiles ordered by descending triangle count
/// so that alpha-beta sees the likelier scoring moves early.
pub fn all_possible_moves(
    board: &Board,
    hand: &Hand,
    player: Player,
    mode: GameMode,
    cache: &mut FrontierCache,
) -> Vec<Move> {
    let mut moves = Vec::new();
    generate_placements(board, hand, cache, &mut moves);
    if mode == GameMode::Moving {
        generate_relocations(board, player, &mut moves);
    }
    moves
}

fn generate_placements(
    board: &Board,
    hand: &Hand,
    cache: &mut FrontierCache,
    moves: &mut Vec<Move>,
) {
    if hand.is_empty() {
        return;
    }
    let frontier = cache.outside_empty_cells(board);

    for tile in hand.ordered_for_search() {
        for orientation in unique_orientations(tile.pattern()) {
            let oriented = tile.with_orientation(orientation);
            for &to in frontier.iter() {
                if is_frontier_placement_valid(&oriented, to, board) {
                    moves.push(Move::Place {
                        tile: tile.id,
                        orientation,
                        to,
                    });
                }
            }
        }
    }
}

fn generate_relocations(board: &Board, player: Player, moves: &mut Vec<Move>) {
    for (from, tile) in board.tiles_of(player) {
        for (to, orientation) in relocation_targets(board, from) {
            moves.push(Move::Relocate {
                tile: tile.id,
                orientation,
                from,
                to,
            });
        }
    }
}
