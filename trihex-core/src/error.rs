//! Error types

use crate::tile::TileId;

/// An action the rules refuse. The game state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("the game is over")]
    GameOver,

    #[error("tile {0} is not in the mover's hand")]
    TileNotInHand(TileId),

    #[error("tile {0} is not on the board where the move says")]
    TileNotOnBoard(TileId),

    #[error("tile {0} belongs to the other player")]
    NotYourTile(TileId),

    #[error("cell ({q}, {r}) is occupied")]
    CellOccupied { q: i32, r: i32 },

    #[error("orientation {0} is out of range 0..6")]
    InvalidOrientation(u8),

    #[error("relocation is only allowed in moving mode")]
    RelocationDisabled,

    #[error("tile {tile} cannot be placed at ({q}, {r})")]
    IllegalPlacement { tile: TileId, q: i32, r: i32 },

    #[error("tile {tile} cannot relocate to ({q}, {r})")]
    IllegalRelocation { tile: TileId, q: i32, r: i32 },

    #[error("a pass is only allowed with no legal move")]
    PassNotAllowed,
}

/// A snapshot that does not describe a valid position
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("unknown player id {0} (expected 1 or 2)")]
    UnknownPlayer(u8),

    #[error("acting and opponent player ids are both {0}")]
    SamePlayers(u8),

    #[error("tile {id} has {len} edges (expected 6)")]
    EdgeCount { id: TileId, len: usize },

    #[error("tile {id} has orientation {orientation} (expected 0..6)")]
    Orientation { id: TileId, orientation: u8 },

    #[error("board tile {0} has no position")]
    MissingPosition(TileId),

    #[error("two tiles share cell ({q}, {r})")]
    DuplicateCell { q: i32, r: i32 },

    #[error("tile id {0} appears more than once")]
    DuplicateTile(TileId),

    #[error("tile {id} sits in player {expected}'s hand but is owned by the other player")]
    WrongOwner { id: TileId, expected: u8 },

    #[error("tile reference {0} does not match the board")]
    StaleTileRef(TileId),

    #[error("tile {0} is not surrounded")]
    NotSurrounded(TileId),
}

/// Search failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("search cancelled")]
    Cancelled,

    #[error("simulation failed: {0}")]
    Rule(#[from] RuleError),
}
