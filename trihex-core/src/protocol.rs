//! Serializable snapshots exchanged with a search worker
//!
//! Requests carry plain records (no behaviour, identity by `id` only) and are
//! turned into owned engine values before any search runs, so the caller's
//! state can never be touched by a simulation.

use crate::board::Board;
use crate::config::Difficulty;
use crate::error::SnapshotError;
use crate::hand::{Hand, Hands};
use crate::hex::Hex;
use crate::moves::{GameMode, Move};
use crate::position::Position;
use crate::tile::{Edge, Player, Tile, TileId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

// ============================================================================
// SNAPSHOTS
// ============================================================================

/// A tile as seen across the worker boundary. `x`/`y` are axial `q`/`r`
/// and present only for tiles on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSnapshot {
    pub id: TileId,
    pub owner_id: u8,
    /// Unrotated edge pattern
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub orientation: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}

impl TileSnapshot {
    pub fn from_tile(tile: &Tile, at: Option<Hex>) -> Self {
        Self {
            id: tile.id,
            owner_id: tile.owner.id(),
            edges: tile.pattern().edges().to_vec(),
            orientation: tile.orientation(),
            x: at.map(|h| h.q),
            y: at.map(|h| h.r),
        }
    }

    pub fn to_tile(&self) -> Result<Tile, SnapshotError> {
        let owner = player(self.owner_id)?;
        let edges: [Edge; 6] = self
            .edges
            .as_slice()
            .try_into()
            .map_err(|_| SnapshotError::EdgeCount { id: self.id, len: self.edges.len() })?;
        if self.orientation >= 6 {
            return Err(SnapshotError::Orientation { id: self.id, orientation: self.orientation });
        }
        let pattern = crate::tile::EdgePattern::from_edges(edges);
        Ok(Tile::new(self.id, owner, pattern).with_orientation(self.orientation))
    }

    pub fn position(&self) -> Option<Hex> {
        Some(Hex::new(self.x?, self.y?))
    }
}

/// Reference to a tile on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileRef {
    pub id: TileId,
    pub x: i32,
    pub y: i32,
    pub owner_id: u8,
}

impl TileRef {
    pub fn new(at: Hex, tile: &Tile) -> Self {
        Self {
            id: tile.id,
            x: at.q,
            y: at.r,
            owner_id: tile.owner.id(),
        }
    }

    pub fn hex(&self) -> Hex {
        Hex::new(self.x, self.y)
    }
}

fn player(id: u8) -> Result<Player, SnapshotError> {
    Player::from_id(id).ok_or(SnapshotError::UnknownPlayer(id))
}

/// Snapshot every tile on the board, in coordinate order
pub fn board_to_snapshots(board: &Board) -> Vec<TileSnapshot> {
    board
        .occupied()
        .into_iter()
        .filter_map(|at| board.get(at).map(|t| TileSnapshot::from_tile(t, Some(at))))
        .collect()
}

pub fn hand_to_snapshots(hand: &Hand) -> Vec<TileSnapshot> {
    hand.tiles().iter().map(|t| TileSnapshot::from_tile(t, None)).collect()
}

/// Rebuild a board; every tile needs a position and cells may not repeat
pub fn board_from_snapshots(tiles: &[TileSnapshot]) -> Result<Board, SnapshotError> {
    let mut board = Board::new();
    let mut ids = FxHashSet::default();
    for snapshot in tiles {
        let tile = snapshot.to_tile()?;
        let at = snapshot.position().ok_or(SnapshotError::MissingPosition(tile.id))?;
        if !ids.insert(tile.id) {
            return Err(SnapshotError::DuplicateTile(tile.id));
        }
        if board.insert(at, tile).is_some() {
            return Err(SnapshotError::DuplicateCell { q: at.q, r: at.r });
        }
    }
    Ok(board)
}

/// Rebuild `owner`'s hand; positions and orientations are ignored
pub fn hand_from_snapshots(tiles: &[TileSnapshot], owner: Player) -> Result<Hand, SnapshotError> {
    let mut hand = Hand::default();
    for snapshot in tiles {
        let tile = snapshot.to_tile()?;
        if tile.owner != owner {
            return Err(SnapshotError::WrongOwner { id: tile.id, expected: owner.id() });
        }
        if hand.contains(tile.id) {
            return Err(SnapshotError::DuplicateTile(tile.id));
        }
        hand.give_back(tile);
    }
    Ok(hand)
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Ask for a move for the acting player
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub board: Vec<TileSnapshot>,
    pub own_hand: Vec<TileSnapshot>,
    pub opponent_hand: Vec<TileSnapshot>,
    pub acting_player_id: u8,
    pub opponent_player_id: u8,
    #[serde(default)]
    pub mode: GameMode,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl MoveRequest {
    /// Snapshot a live position
    pub fn from_position(
        position: &Position,
        acting: Player,
        mode: GameMode,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            board: board_to_snapshots(&position.board),
            own_hand: hand_to_snapshots(position.hand(acting)),
            opponent_hand: hand_to_snapshots(position.hand(acting.opponent())),
            acting_player_id: acting.id(),
            opponent_player_id: acting.opponent().id(),
            mode,
            difficulty,
        }
    }

    /// Owned position plus the acting player
    pub fn to_position(&self) -> Result<(Position, Player), SnapshotError> {
        let acting = player(self.acting_player_id)?;
        let opponent = player(self.opponent_player_id)?;
        if acting == opponent {
            return Err(SnapshotError::SamePlayers(self.acting_player_id));
        }

        let board = board_from_snapshots(&self.board)?;
        let own = hand_from_snapshots(&self.own_hand, acting)?;
        let other = hand_from_snapshots(&self.opponent_hand, opponent)?;

        for tile in own.tiles().iter().chain(other.tiles()) {
            if board.position_of(tile.id).is_some() {
                return Err(SnapshotError::DuplicateTile(tile.id));
            }
        }

        let hands = match acting {
            Player::One => Hands::new(own, other),
            Player::Two => Hands::new(other, own),
        };
        Ok((Position::new(board, hands), acting))
    }
}

/// Ask which surrounded tile the acting player removes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalRequest {
    pub board: Vec<TileSnapshot>,
    pub surrounded_tiles: Vec<TileRef>,
    pub acting_player_id: u8,
    #[serde(default)]
    pub difficulty: Difficulty,
}

impl RemovalRequest {
    /// Owned board, the candidate cells and the acting player
    pub fn resolve(&self) -> Result<(Board, Vec<Hex>, Player), SnapshotError> {
        let acting = player(self.acting_player_id)?;
        let board = board_from_snapshots(&self.board)?;
        let mut candidates = Vec::with_capacity(self.surrounded_tiles.len());
        for tile_ref in &self.surrounded_tiles {
            let at = tile_ref.hex();
            if !board.get(at).is_some_and(|t| t.id == tile_ref.id) {
                return Err(SnapshotError::StaleTileRef(tile_ref.id));
            }
            if !board.is_tile_surrounded(at) {
                return Err(SnapshotError::NotSurrounded(tile_ref.id));
            }
            candidates.push(at);
        }
        Ok((board, candidates, acting))
    }
}

// ============================================================================
// RESPONSES
// ============================================================================

/// Chosen move, or `none` when the acting player must pass
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MoveResponse {
    #[serde(rename_all = "camelCase")]
    Place { tile_id: TileId, orientation: u8, x: i32, y: i32 },
    #[serde(rename_all = "camelCase")]
    Relocate {
        tile_id: TileId,
        orientation: u8,
        from_x: i32,
        from_y: i32,
        to_x: i32,
        to_y: i32,
    },
    None,
}

impl MoveResponse {
    pub fn to_move(self) -> Option<Move> {
        match self {
            MoveResponse::Place { tile_id, orientation, x, y } => Some(Move::Place {
                tile: tile_id,
                orientation,
                to: Hex::new(x, y),
            }),
            MoveResponse::Relocate { tile_id, orientation, from_x, from_y, to_x, to_y } => {
                Some(Move::Relocate {
                    tile: tile_id,
                    orientation,
                    from: Hex::new(from_x, from_y),
                    to: Hex::new(to_x, to_y),
                })
            }
            MoveResponse::None => None,
        }
    }
}

impl From<Move> for MoveResponse {
    fn from(mv: Move) -> Self {
        match mv {
            Move::Place { tile, orientation, to } => MoveResponse::Place {
                tile_id: tile,
                orientation,
                x: to.q,
                y: to.r,
            },
            Move::Relocate { tile, orientation, from, to } => MoveResponse::Relocate {
                tile_id: tile,
                orientation,
                from_x: from.q,
                from_y: from.r,
                to_x: to.q,
                to_y: to.r,
            },
        }
    }
}

impl From<Option<Move>> for MoveResponse {
    fn from(mv: Option<Move>) -> Self {
        mv.map_or(MoveResponse::None, MoveResponse::from)
    }
}

/// The tile to remove; serialized as `null` when nothing is chosen
pub type RemovalResponse = Option<TileRef>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::ORIGIN;

    #[test]
    fn test_move_request_json() {
        let json = r#"{
            "board": [{
                "id": 0,
                "ownerId": 1,
                "edges": ["triangle", "blank", "blank", "blank", "blank", "blank"],
                "orientation": 0,
                "x": 0,
                "y": 0
            }],
            "ownHand": [{
                "id": 1,
                "ownerId": 1,
                "edges": ["triangle", "blank", "blank", "blank", "blank", "blank"]
            }],
            "opponentHand": [],
            "actingPlayerId": 1,
            "opponentPlayerId": 2,
            "mode": "moving",
            "difficulty": "greedy"
        }"#;
        let request: MoveRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.mode, GameMode::Moving);
        assert_eq!(request.difficulty, Difficulty::Greedy);

        let (position, acting) = request.to_position().unwrap();
        assert_eq!(acting, Player::One);
        assert_eq!(position.board.get(ORIGIN).unwrap().id, 0);
        assert!(position.hand(Player::One).contains(1));
        assert!(position.hand(Player::Two).is_empty());
    }

    #[test]
    fn test_snapshot_round_trip_keeps_orientation() {
        let mut position = Position::initial();
        position
            .play(Move::Place { tile: 3, orientation: 4, to: ORIGIN }, Player::One)
            .unwrap();
        let request =
            MoveRequest::from_position(&position, Player::Two, GameMode::Basic, Difficulty::Hard);
        let (restored, acting) = request.to_position().unwrap();
        assert_eq!(acting, Player::Two);
        assert_eq!(restored, position);
    }

    #[test]
    fn test_malformed_snapshots_rejected() {
        let tile = |id, owner_id, x: Option<i32>| TileSnapshot {
            id,
            owner_id,
            edges: vec![Edge::Blank; 6],
            orientation: 0,
            x,
            y: x,
        };

        let mut bad_edges = tile(0, 1, Some(0));
        bad_edges.edges.pop();
        assert_eq!(
            board_from_snapshots(&[bad_edges]),
            Err(SnapshotError::EdgeCount { id: 0, len: 5 })
        );
        assert_eq!(
            board_from_snapshots(&[tile(0, 1, None)]),
            Err(SnapshotError::MissingPosition(0))
        );
        assert_eq!(
            board_from_snapshots(&[tile(0, 1, Some(0)), tile(1, 1, Some(0))]),
            Err(SnapshotError::DuplicateCell { q: 0, r: 0 })
        );
        assert_eq!(
            hand_from_snapshots(&[tile(14, 2, None)], Player::One),
            Err(SnapshotError::WrongOwner { id: 14, expected: 1 })
        );
        assert_eq!(
            board_from_snapshots(&[tile(0, 3, Some(0))]),
            Err(SnapshotError::UnknownPlayer(3))
        );

        let request = MoveRequest {
            board: vec![],
            own_hand: vec![],
            opponent_hand: vec![],
            acting_player_id: 2,
            opponent_player_id: 2,
            mode: GameMode::Basic,
            difficulty: Difficulty::Medium,
        };
        assert_eq!(request.to_position(), Err(SnapshotError::SamePlayers(2)));
    }

    #[test]
    fn test_move_response_shape() {
        let mv = Move::Relocate { tile: 4, orientation: 1, from: ORIGIN, to: Hex::new(1, -1) };
        let response = MoveResponse::from(mv);
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["type"], "relocate");
        assert_eq!(json["tileId"], 4);
        assert_eq!(json["toY"], -1);
        assert_eq!(response.to_move(), Some(mv));

        let none = serde_json::to_string(&MoveResponse::from(None)).unwrap();
        assert_eq!(none, r#"{"type":"none"}"#);
        let no_removal: RemovalResponse = None;
        assert_eq!(serde_json::to_string(&no_removal).unwrap(), "null");
    }

    #[test]
    fn test_removal_request_checks_refs() {
        let blank = |id, owner| Tile::new(id, owner, crate::tile::EdgePattern::from_bits(0));
        let mut board = Board::new();
        let tile = blank(20, Player::Two);
        board.insert(ORIGIN, tile);
        for (i, (_, n)) in ORIGIN.neighbors().enumerate() {
            board.insert(n, blank(i as u8, Player::One));
        }
        let request = RemovalRequest {
            board: board_to_snapshots(&board),
            surrounded_tiles: vec![TileRef::new(ORIGIN, &tile)],
            acting_player_id: 1,
            difficulty: Difficulty::Medium,
        };
        let (restored, candidates, acting) = request.resolve().unwrap();
        assert_eq!(restored, board);
        assert_eq!(candidates, vec![ORIGIN]);
        assert_eq!(acting, Player::One);

        let stale = RemovalRequest {
            surrounded_tiles: vec![TileRef { id: 21, x: 0, y: 0, owner_id: 2 }],
            ..request
        };
        assert_eq!(stale.resolve(), Err(SnapshotError::StaleTileRef(21)));
    }

    #[test]
    fn test_removal_request_rejects_open_tile() {
        let blank = |id, owner| Tile::new(id, owner, crate::tile::EdgePattern::from_bits(0));
        let mut board = Board::new();
        let centre = blank(20, Player::Two);
        board.insert(ORIGIN, centre);
        // Five of six neighbours: one side stays open
        for (i, (_, n)) in ORIGIN.neighbors().take(5).enumerate() {
            board.insert(n, blank(i as u8, Player::One));
        }
        let request = RemovalRequest {
            board: board_to_snapshots(&board),
            surrounded_tiles: vec![TileRef::new(ORIGIN, &centre)],
            acting_player_id: 1,
            difficulty: Difficulty::Medium,
        };
        assert_eq!(request.resolve(), Err(SnapshotError::NotSurrounded(20)));
    }
}
