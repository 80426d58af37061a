//! Tiles a player holds off the board

use crate::tile::{standard_tile_set, Player, Tile, TileId};
use serde::{Deserialize, Serialize};

/// One player's hand, kept sorted by tile id
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    tiles: Vec<Tile>,
}

impl Hand {
    pub fn new(tiles: impl IntoIterator<Item = Tile>) -> Self {
        let mut hand = Self::default();
        for tile in tiles {
            hand.give_back(tile);
        }
        hand
    }

    /// The full starting hand
    pub fn full(player: Player) -> Self {
        Self::new(standard_tile_set(player))
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.get(id).is_some()
    }

    /// Remove a tile for placement
    pub fn take(&mut self, id: TileId) -> Option<Tile> {
        let index = self.tiles.iter().position(|t| t.id == id)?;
        Some(self.tiles.remove(index))
    }

    /// Return a tile to the hand in its default orientation
    pub fn give_back(&mut self, tile: Tile) {
        let tile = tile.with_orientation(0);
        match self.tiles.binary_search_by_key(&tile.id, |t| t.id) {
            Ok(index) => self.tiles[index] = tile,
            Err(index) => self.tiles.insert(index, tile),
        }
    }

    /// Tiles ordered for search: most triangle edges first
    pub fn ordered_for_search(&self) -> Vec<Tile> {
        let mut tiles = self.tiles.clone();
        tiles.sort_by_key(|t| (std::cmp::Reverse(t.pattern().triangles()), t.id));
        tiles
    }
}

/// Both players' hands
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hands {
    hands: [Hand; 2],
}

impl Hands {
    pub fn new(one: Hand, two: Hand) -> Self {
        Self { hands: [one, two] }
    }

    pub fn full() -> Self {
        Self::new(Hand::full(Player::One), Hand::full(Player::Two))
    }

    pub fn get(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn get_mut(&mut self, player: Player) -> &mut Hand {
        &mut self.hands[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_and_give_back() {
        let mut hand = Hand::full(Player::One);
        let tile = hand.take(3).unwrap().with_orientation(4);
        assert_eq!(hand.len(), 13);
        assert!(!hand.contains(3));
        hand.give_back(tile);
        assert_eq!(hand.len(), 14);
        assert_eq!(hand.get(3).unwrap().orientation(), 0);
        assert!(hand.take(99).is_none());
    }

    #[test]
    fn test_search_order() {
        let hand = Hand::full(Player::Two);
        let ordered = hand.ordered_for_search();
        assert_eq!(ordered[0].pattern().triangles(), 6);
        assert_eq!(ordered.last().unwrap().pattern().triangles(), 0);
        assert!(ordered
            .windows(2)
            .all(|w| w[0].pattern().triangles() >= w[1].pattern().triangles()));
    }
}
