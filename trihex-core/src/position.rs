//! Board plus both hands

use crate::board::Board;
use crate::error::RuleError;
use crate::hand::{Hand, Hands};
use crate::moves::Move;
use crate::removal::{simulate_removal_cycle, Removal, RemovalPolicy};
use crate::tile::Player;

/// Everything a move touches. Cloned for every simulated branch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub hands: Hands,
}

impl Position {
    pub fn new(board: Board, hands: Hands) -> Self {
        Self { board, hands }
    }

    /// Empty board, both hands full
    pub fn initial() -> Self {
        Self::new(Board::new(), Hands::full())
    }

    pub fn hand(&self, player: Player) -> &Hand {
        self.hands.get(player)
    }

    /// Carry out a move for `mover` without checking placement rules
    ///
    /// Only the bookkeeping is verified (the tile is where the move says it
    /// is and belongs to `mover`); nothing is changed when that fails.
    pub fn play(&mut self, mv: Move, mover: Player) -> Result<(), RuleError> {
        match mv {
            Move::Place { tile, orientation, to } => {
                if self.board.is_occupied(to) {
                    return Err(RuleError::CellOccupied { q: to.q, r: to.r });
                }
                let placed = self
                    .hands
                    .get_mut(mover)
                    .take(tile)
                    .ok_or(RuleError::TileNotInHand(tile))?;
                self.board.insert(to, placed.with_orientation(orientation));
            }
            Move::Relocate { tile, orientation, from, to } => {
                match self.board.get(from) {
                    Some(t) if t.id != tile => return Err(RuleError::TileNotOnBoard(tile)),
                    Some(t) if t.owner != mover => return Err(RuleError::NotYourTile(tile)),
                    Some(_) => {}
                    None => return Err(RuleError::TileNotOnBoard(tile)),
                }
                if to != from && self.board.is_occupied(to) {
                    return Err(RuleError::CellOccupied { q: to.q, r: to.r });
                }
                if let Some(lifted) = self.board.remove(from) {
                    self.board.insert(to, lifted.with_orientation(orientation));
                }
            }
        }
        Ok(())
    }

    /// Run the removal cascade for `acting`
    pub fn resolve_removals(
        &mut self,
        acting: Player,
        policy: &mut dyn RemovalPolicy,
        max_steps: usize,
    ) -> Vec<Removal> {
        simulate_removal_cycle(&mut self.board, &mut self.hands, acting, policy, max_steps)
    }
}
