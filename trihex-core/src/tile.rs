//! Tiles, edge patterns and players

use serde::{Deserialize, Serialize};

/// Tile identifier, unique across both players
pub type TileId = u8;

/// Number of tiles each player starts with (one per rotation class)
pub const TILES_PER_PLAYER: usize = 14;

/// Player. `One` always moves first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Wire id (1 or 2)
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }

    /// Array index (0 or 1)
    pub fn index(self) -> usize {
        self as usize - 1
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Player::from_id(id).ok_or_else(|| format!("unknown player id {id}"))
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.id()
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}", self.id())
    }
}

/// Edge marker
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Triangle,
    Blank,
}

/// Six edge markers packed clockwise: bit `i` set = triangle on edge `i`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgePattern(u8);

impl EdgePattern {
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x3f)
    }

    pub fn from_edges(edges: [Edge; 6]) -> Self {
        let bits = edges
            .iter()
            .enumerate()
            .filter(|(_, e)| **e == Edge::Triangle)
            .fold(0u8, |acc, (i, _)| acc | (1 << i));
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn edge(self, index: usize) -> Edge {
        if self.0 & (1 << (index % 6)) != 0 {
            Edge::Triangle
        } else {
            Edge::Blank
        }
    }

    pub fn edges(self) -> [Edge; 6] {
        std::array::from_fn(|i| self.edge(i))
    }

    /// The pattern read starting at index `orientation`
    pub fn rotated(self, orientation: u8) -> Self {
        let o = u32::from(orientation % 6);
        Self(((self.0 >> o) | (self.0 << (6 - o))) & 0x3f)
    }

    pub fn triangles(self) -> u32 {
        self.0.count_ones()
    }

    pub fn blanks(self) -> u32 {
        6 - self.triangles()
    }

    /// Smallest rotation, identifying the rotation class
    pub fn canonical(self) -> Self {
        (0..6).map(|o| self.rotated(o)).min().unwrap_or(self)
    }
}

/// A tile. The edge pattern is fixed at creation; only the orientation changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub owner: Player,
    pattern: EdgePattern,
    orientation: u8,
}

impl Tile {
    pub fn new(id: TileId, owner: Player, pattern: EdgePattern) -> Self {
        Self {
            id,
            owner,
            pattern,
            orientation: 0,
        }
    }

    /// Unrotated edge pattern
    pub fn pattern(&self) -> EdgePattern {
        self.pattern
    }

    pub fn orientation(&self) -> u8 {
        self.orientation
    }

    pub fn with_orientation(self, orientation: u8) -> Self {
        Self {
            orientation: orientation % 6,
            ..self
        }
    }

    /// Edges as they sit on the board
    pub fn oriented_edges(&self) -> EdgePattern {
        self.pattern.rotated(self.orientation)
    }

    /// Oriented edge facing direction `edge`
    pub fn edge(&self, edge: usize) -> Edge {
        self.oriented_edges().edge(edge)
    }
}

/// Rotation classes of 6-bit patterns in ascending canonical order
pub fn canonical_patterns() -> Vec<EdgePattern> {
    let mut patterns: Vec<EdgePattern> = (0..64u8)
        .map(|bits| EdgePattern::from_bits(bits).canonical())
        .collect();
    patterns.sort();
    patterns.dedup();
    patterns
}

/// The 14 tiles a player starts the game with
pub fn standard_tile_set(player: Player) -> Vec<Tile> {
    let base = (player.index() * TILES_PER_PLAYER) as TileId;
    canonical_patterns()
        .into_iter()
        .enumerate()
        .map(|(i, pattern)| Tile::new(base + i as TileId, player, pattern))
        .collect()
}
