//! Hex grid geometry with axial coordinates
//!
//! Flat-topped layout. Edge `i` of a tile faces direction `i`, so edge `i`
//! on one tile touches edge `(i + 3) % 6` on the neighbor across that side.

use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// The only legal cell for the first tile of a game
pub const ORIGIN: Hex = Hex::new(0, 0);

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Edge index on the neighbor that faces `edge`
pub const fn opposite_edge(edge: usize) -> usize {
    (edge + 3) % 6
}

impl Hex {
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = self.q - other.q;
        let dr = self.r - other.r;
        (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i32 {
        self.distance_to(ORIGIN)
    }

    /// Squared Euclidean distance from the origin, in units of a third of
    /// the hex size squared (integer so it can be used as a sort key).
    pub fn euclid_sq(&self) -> i64 {
        let q = self.q as i64;
        let r = self.r as i64;
        3 * q * q + (2 * r + q) * (2 * r + q)
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, paired with the edge index that faces each one
    pub fn neighbors(&self) -> impl Iterator<Item = (usize, Hex)> + '_ {
        (0..6).map(move |edge| (edge, self.neighbor(edge)))
    }

    /// Every hex within `radius` of this one, center first, ring by ring
    pub fn spiral(self, radius: i32) -> impl Iterator<Item = Hex> {
        std::iter::once(self).chain((1..=radius.max(0)).flat_map(move |d| iter_hex_ring(self, d)))
    }
}

/// Generate all hex positions at exactly distance N from center
fn iter_hex_ring(center: Hex, distance: i32) -> impl Iterator<Item = Hex> {
    (0..6).flat_map(move |side| {
        let dir = DIRECTIONS[side];
        let corner = DIRECTIONS[(side + 4) % 6];
        (0..distance).map(move |step| {
            // Start at the corner for this side, then walk along the edge
            Hex::new(
                center.q + distance * corner.0 + step * dir.0,
                center.r + distance * corner.1 + step * dir.1,
            )
        })
    })
}
