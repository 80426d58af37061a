//! Placement and relocation legality

use crate::board::Board;
use crate::hex::{opposite_edge, Hex, ORIGIN};
use crate::tile::{EdgePattern, Tile};

/// Whether a placement brings a new tile from hand or relocates one already on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementKind {
    /// From hand: only frontier cells are admissible
    New,
    /// From elsewhere on the board: interior cells are admissible
    Relocation,
}

/// Orientations (0..6) that produce distinct oriented edge patterns
pub fn unique_orientations(pattern: EdgePattern) -> Vec<u8> {
    let mut seen: Vec<EdgePattern> = Vec::with_capacity(6);
    let mut orientations = Vec::with_capacity(6);
    for o in 0..6u8 {
        let rotated = pattern.rotated(o);
        if !seen.contains(&rotated) {
            seen.push(rotated);
            orientations.push(o);
        }
    }
    orientations
}

/// Check whether `tile`, in its current orientation, may go on `at`
pub fn is_placement_valid(tile: &Tile, at: Hex, board: &Board, kind: PlacementKind) -> bool {
    if board.is_occupied(at) {
        return false;
    }
    if board.is_empty() {
        return at == ORIGIN;
    }
    if kind == PlacementKind::New && !board.outside_empty_cells().contains(&at) {
        return false;
    }
    edges_fit(tile, at, board)
}

/// Placement check for a cell already known to be on the frontier
pub(crate) fn is_frontier_placement_valid(tile: &Tile, at: Hex, board: &Board) -> bool {
    if board.is_empty() {
        return at == ORIGIN;
    }
    if board.is_occupied(at) {
        return false;
    }
    if board.is_space_enclosed(at) {
        tracing::warn!("frontier contains enclosed cell ({}, {})", at.q, at.r);
        return false;
    }
    edges_fit(tile, at, board)
}

/// Touches at least one tile and every facing edge pair has equal type
pub fn edges_fit(tile: &Tile, at: Hex, board: &Board) -> bool {
    let mut touches = false;
    for (edge, n) in at.neighbors() {
        if let Some(other) = board.get(n) {
            touches = true;
            if tile.edge(edge) != other.edge(opposite_edge(edge)) {
                return false;
            }
        }
    }
    touches
}

/// How far a tile may travel: its blank edge count in the current orientation
pub fn relocation_range(tile: &Tile) -> i32 {
    tile.oriented_edges().blanks() as i32
}

/// All `(destination, orientation)` pairs the tile on `from` may relocate to
///
/// Includes rotating in place (destination == `from`) when the new
/// orientation changes the oriented pattern. Empty when lifting the tile
/// would split the board.
pub fn relocation_targets(board: &Board, from: Hex) -> Vec<(Hex, u8)> {
    let Some(tile) = board.get(from).copied() else {
        return Vec::new();
    };
    let mut lifted = board.clone();
    lifted.remove(from);
    if !lifted.is_connected() {
        return Vec::new();
    }

    let current = tile.oriented_edges();
    let orientations = unique_orientations(tile.pattern());
    let mut targets = Vec::new();

    for to in from.spiral(relocation_range(&tile)) {
        if to != from && lifted.is_occupied(to) {
            continue;
        }
        for &o in &orientations {
            let moved = tile.with_orientation(o);
            if to == from && moved.oriented_edges() == current {
                continue;
            }
            if is_placement_valid(&moved, to, &lifted, PlacementKind::Relocation) {
                targets.push((to, o));
            }
        }
    }
    targets
}

/// Check a single relocation of the tile on `from`
pub fn is_relocation_valid(board: &Board, from: Hex, to: Hex, orientation: u8) -> bool {
    let Some(tile) = board.get(from).copied() else {
        return false;
    };
    let moved = tile.with_orientation(orientation);
    if to == from && moved.oriented_edges() == tile.oriented_edges() {
        return false;
    }
    if from.distance_to(to) > relocation_range(&tile) {
        return false;
    }
    let mut lifted = board.clone();
    lifted.remove(from);
    if !lifted.is_connected() {
        return false;
    }
    is_placement_valid(&moved, to, &lifted, PlacementKind::Relocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Edge::Blank as B, Edge::Triangle as T, Player};

    fn tile(id: u8, edges: [crate::tile::Edge; 6]) -> Tile {
        Tile::new(id, Player::One, EdgePattern::from_edges(edges))
    }

    #[test]
    fn test_unique_orientations() {
        assert_eq!(unique_orientations(EdgePattern::from_bits(0)), vec![0]);
        assert_eq!(unique_orientations(EdgePattern::from_bits(0x3f)), vec![0]);
        assert_eq!(unique_orientations(EdgePattern::from_edges([T, B, T, B, T, B])).len(), 2);
        assert_eq!(unique_orientations(EdgePattern::from_edges([T, B, B, T, B, B])).len(), 3);
        assert_eq!(unique_orientations(EdgePattern::from_edges([T, B, B, B, B, B])).len(), 6);
    }

    #[test]
    fn test_blank_tile_only_at_origin_on_empty_board() {
        let board = Board::new();
        let t = tile(0, [B; 6]);
        assert!(is_placement_valid(&t, ORIGIN, &board, PlacementKind::New));
        assert!(!is_placement_valid(&t, Hex::new(1, 0), &board, PlacementKind::New));
    }

    #[test]
    fn test_mismatched_edge_is_illegal() {
        let mut board = Board::new();
        board.insert(ORIGIN, tile(0, [B; 6]));
        let t = tile(1, [T, B, B, B, B, B]);
        // North neighbor: its edge 3 faces the origin tile's blank edge 0
        let north = ORIGIN.neighbor(0);
        assert!(is_placement_valid(&t, north, &board, PlacementKind::New));
        assert!(!is_placement_valid(&t.with_orientation(3), north, &board, PlacementKind::New));
        // Not touching anything
        assert!(!is_placement_valid(&t, Hex::new(3, 0), &board, PlacementKind::New));
        // Occupied
        assert!(!is_placement_valid(&t, ORIGIN, &board, PlacementKind::New));
    }

    #[test]
    fn test_interior_cell_only_for_relocation() {
        let mut board = Board::new();
        for (i, (_, n)) in ORIGIN.neighbors().enumerate() {
            board.insert(n, tile(i as u8, [B; 6]));
        }
        let t = tile(9, [B; 6]);
        assert!(!is_placement_valid(&t, ORIGIN, &board, PlacementKind::New));
        assert!(is_placement_valid(&t, ORIGIN, &board, PlacementKind::Relocation));
    }

    #[test]
    fn test_all_triangle_tile_cannot_relocate() {
        let mut board = Board::new();
        board.insert(ORIGIN, tile(0, [T; 6]));
        board.insert(ORIGIN.neighbor(0), tile(1, [T; 6]));
        assert_eq!(relocation_range(board.get(ORIGIN).unwrap()), 0);
        assert!(relocation_targets(&board, ORIGIN).is_empty());
    }

    #[test]
    fn test_rotate_in_place_without_blanks_to_spare() {
        // Five triangles, one blank: range 1, and rotations change the pattern
        let mut board = Board::new();
        board.insert(ORIGIN, tile(0, [B, T, T, T, T, T]));
        board.insert(ORIGIN.neighbor(3), tile(1, [T; 6]));
        let targets = relocation_targets(&board, ORIGIN);
        // Rotating so a triangle still faces the southern neighbor keeps it legal
        assert!(targets.iter().any(|&(to, _)| to == ORIGIN));
        assert!(targets.iter().all(|&(to, o)| is_relocation_valid(&board, ORIGIN, to, o)));
    }

    #[test]
    fn test_relocation_that_splits_board_is_rejected() {
        let mut board = Board::new();
        board.insert(Hex::new(0, -1), tile(0, [B; 6]));
        board.insert(ORIGIN, tile(1, [B; 6]));
        board.insert(Hex::new(0, 1), tile(2, [B; 6]));
        assert!(relocation_targets(&board, ORIGIN).is_empty());
        assert!(!is_relocation_valid(&board, ORIGIN, Hex::new(1, 0), 0));
        // An end tile may move
        assert!(!relocation_targets(&board, Hex::new(0, 1)).is_empty());
    }
}
