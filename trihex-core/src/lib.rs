//! TRIHEX Core - Rules engine and AI
//!
//! This crate provides the core game logic for TRIHEX:
//! - Hex grid math (axial coordinates, flat-topped)
//! - Tiles, hands and the board with its frontier cache
//! - Placement and relocation legality
//! - Scoring and the surrounded-tile removal cascade
//! - Move generation for basic and moving modes
//! - Random, greedy and minimax alpha-beta AI
//! - Serializable snapshots for running search off-thread

pub mod hex;
pub mod tile;
pub mod hand;
pub mod board;
pub mod rules;
pub mod eval;
pub mod removal;
pub mod moves;
pub mod position;
pub mod game;
pub mod search;
pub mod ai;
pub mod config;
pub mod error;
pub mod protocol;

// Re-exports for convenient access
pub use hex::{Hex, DIRECTIONS, ORIGIN};
pub use tile::{Edge, EdgePattern, Player, Tile, TileId, TILES_PER_PLAYER};
pub use hand::{Hand, Hands};
pub use board::{Board, FrontierCache};
pub use eval::{evaluate, score, scores, EvalConfig};
pub use removal::{EvaluativeRemoval, FirstListed, Removal, RemovalPolicy};
pub use moves::{all_possible_moves, GameMode, Move};
pub use position::Position;
pub use game::{GameResult, GameState, TurnReport};
pub use search::{SearchEvent, SearchObserver, SearchOutcome, SearchStats, Searcher};
pub use ai::TrihexAi;
pub use config::{AiConfig, Difficulty, EngineConfig, SearchConfig};
pub use error::{RuleError, SearchError, SnapshotError};
pub use protocol::{
    MoveRequest, MoveResponse, RemovalRequest, RemovalResponse, TileRef, TileSnapshot,
};
