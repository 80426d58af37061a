//! Sparse board: occupied cells, connectivity and the placement frontier

use crate::hex::{Hex, ORIGIN};
use crate::tile::{Player, Tile, TileId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::sync::Arc;

/// Default number of frontier sets remembered by a [`FrontierCache`]
pub const FRONTIER_CACHE_CAPACITY: usize = 10;

/// Board: hex -> tile (sparse representation)
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: FxHashMap<Hex, Tile>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, hex: Hex) -> Option<&Tile> {
        self.cells.get(&hex)
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.cells.contains_key(&hex)
    }

    /// Iterate tiles on board (unordered)
    pub fn tiles(&self) -> impl Iterator<Item = (Hex, &Tile)> + '_ {
        self.cells.iter().map(|(&hex, tile)| (hex, tile))
    }

    /// Occupied cells in ascending coordinate order
    pub fn occupied(&self) -> Vec<Hex> {
        let mut cells: Vec<Hex> = self.cells.keys().copied().collect();
        cells.sort_unstable();
        cells
    }

    /// Where a tile currently sits
    pub fn position_of(&self, id: TileId) -> Option<Hex> {
        self.cells
            .iter()
            .find(|(_, tile)| tile.id == id)
            .map(|(&hex, _)| hex)
    }

    /// Put a tile on a cell, returning whatever was there
    pub fn insert(&mut self, at: Hex, tile: Tile) -> Option<Tile> {
        self.cells.insert(at, tile)
    }

    pub fn remove(&mut self, at: Hex) -> Option<Tile> {
        self.cells.remove(&at)
    }

    /// Tiles owned by `player`, in coordinate order
    pub fn tiles_of(&self, player: Player) -> Vec<(Hex, Tile)> {
        self.occupied()
            .into_iter()
            .filter_map(|hex| self.get(hex).map(|t| (hex, *t)))
            .filter(|(_, t)| t.owner == player)
            .collect()
    }

    fn touches_occupied(&self, hex: Hex) -> bool {
        hex.neighbors().any(|(_, n)| self.is_occupied(n))
    }

    fn all_neighbors_occupied(&self, hex: Hex) -> bool {
        hex.neighbors().all(|(_, n)| self.is_occupied(n))
    }

    // ========================================================================
    // TOPOLOGY
    // ========================================================================

    /// True when every tile can reach every other through adjacent tiles
    pub fn is_connected(&self) -> bool {
        let Some(&start) = self.cells.keys().next() else {
            return true;
        };
        let mut seen = FxHashSet::default();
        let mut stack = vec![start];
        seen.insert(start);
        while let Some(cell) = stack.pop() {
            for (_, n) in cell.neighbors() {
                if self.is_occupied(n) && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len() == self.cells.len()
    }

    /// Occupied cell with all six neighbors occupied
    pub fn is_tile_surrounded(&self, hex: Hex) -> bool {
        self.is_occupied(hex) && self.all_neighbors_occupied(hex)
    }

    /// Empty cell with all six neighbors occupied
    pub fn is_space_enclosed(&self, hex: Hex) -> bool {
        !self.is_occupied(hex) && self.all_neighbors_occupied(hex)
    }

    /// Every surrounded tile, in coordinate order
    pub fn surrounded_tiles(&self) -> Vec<Hex> {
        self.occupied()
            .into_iter()
            .filter(|&hex| self.all_neighbors_occupied(hex))
            .collect()
    }

    /// Empty cells on the outer edge of the tile group
    ///
    /// Starts next to the tile farthest from the origin and walks the ring of
    /// empty cells that touch a tile, so holes inside the group are never
    /// reached. An empty board yields just the origin.
    pub fn outside_empty_cells(&self) -> Vec<Hex> {
        if self.is_empty() {
            return vec![ORIGIN];
        }
        let Some(seed) = self.frontier_seed() else {
            return Vec::new();
        };

        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();
        let mut frontier = Vec::new();
        seen.insert(seed);
        queue.push_back(seed);

        while let Some(cell) = queue.pop_front() {
            frontier.push(cell);
            for (_, n) in cell.neighbors() {
                if self.is_occupied(n) || !self.touches_occupied(n) {
                    continue;
                }
                if seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        frontier
    }

    /// Farthest empty neighbor of the farthest tile
    fn frontier_seed(&self) -> Option<Hex> {
        let farthest = self
            .cells
            .keys()
            .copied()
            .max_by_key(|h| (h.euclid_sq(), *h))?;
        farthest
            .neighbors()
            .map(|(_, n)| n)
            .filter(|n| !self.is_occupied(*n))
            .max_by_key(|n| (n.euclid_sq(), *n))
    }
}

/// Memo of frontier sets keyed by board occupancy, oldest evicted first
#[derive(Clone, Debug)]
pub struct FrontierCache {
    entries: VecDeque<(Vec<Hex>, Arc<[Hex]>)>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for FrontierCache {
    fn default() -> Self {
        Self::with_capacity(FRONTIER_CACHE_CAPACITY)
    }
}

impl FrontierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Frontier of `board`, computed at most once per occupancy while cached
    pub fn outside_empty_cells(&mut self, board: &Board) -> Arc<[Hex]> {
        // The frontier depends only on which cells are occupied
        let key = board.occupied();
        if let Some((_, cells)) = self.entries.iter().find(|(k, _)| *k == key) {
            self.hits += 1;
            return Arc::clone(cells);
        }
        self.misses += 1;
        let cells: Arc<[Hex]> = board.outside_empty_cells().into();
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((key, Arc::clone(&cells)));
        cells
    }

    /// Drop every entry. Called whenever the owning game mutates its board.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses)
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
