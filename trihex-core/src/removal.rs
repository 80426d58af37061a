//! Surrounded-tile removal cascade

use crate::board::Board;
use crate::eval::{evaluate, EvalConfig};
use crate::hand::Hands;
use crate::hex::Hex;
use crate::tile::{Player, Tile};
use serde::{Deserialize, Serialize};

/// Safety valve on cascade length
pub const MAX_REMOVAL_STEPS: usize = 10;

/// A tile taken off the board by the cascade and returned to its owner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub at: Hex,
    /// The tile as it sat on the board
    pub tile: Tile,
}

/// Picks which surrounded tile leaves the board at each cascade step
pub trait RemovalPolicy {
    /// `candidates` is never empty. Returning `None` or a cell outside
    /// `candidates` falls back to the first candidate.
    fn choose(&mut self, board: &Board, candidates: &[Hex], acting: Player) -> Option<Hex>;
}

/// Always takes the first candidate
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstListed;

impl RemovalPolicy for FirstListed {
    fn choose(&mut self, _board: &Board, candidates: &[Hex], _acting: Player) -> Option<Hex> {
        candidates.first().copied()
    }
}

/// Removes whichever candidate leaves the best evaluation for the acting
/// player; ties go to the earliest candidate.
#[derive(Clone, Debug)]
pub struct EvaluativeRemoval<'a> {
    eval: &'a EvalConfig,
}

impl<'a> EvaluativeRemoval<'a> {
    pub fn new(eval: &'a EvalConfig) -> Self {
        Self { eval }
    }
}

impl RemovalPolicy for EvaluativeRemoval<'_> {
    fn choose(&mut self, board: &Board, candidates: &[Hex], acting: Player) -> Option<Hex> {
        let ranked = rank_removals(board, candidates, acting, self.eval);
        let best = ranked.iter().map(|&(_, v)| v).max()?;
        ranked.into_iter().find(|&(_, v)| v == best).map(|(hex, _)| hex)
    }
}

/// Opponent tiles when any are surrounded, otherwise the rest
pub fn preferred_targets(board: &Board, surrounded: &[Hex], acting: Player) -> Vec<Hex> {
    let opponent: Vec<Hex> = surrounded
        .iter()
        .copied()
        .filter(|&hex| board.get(hex).is_some_and(|t| t.owner == acting.opponent()))
        .collect();
    if opponent.is_empty() {
        surrounded.to_vec()
    } else {
        opponent
    }
}

/// Evaluation for `acting` after removing each candidate on its own
pub fn rank_removals(
    board: &Board,
    candidates: &[Hex],
    acting: Player,
    eval: &EvalConfig,
) -> Vec<(Hex, i32)> {
    candidates
        .iter()
        .map(|&hex| {
            let mut after = board.clone();
            after.remove(hex);
            (hex, evaluate(&after, acting, eval))
        })
        .collect()
}

/// Remove surrounded tiles one at a time until none remain
///
/// Each step removes exactly one tile, so the loop ends after at most as
/// many steps as there are tiles; `max_steps` caps it regardless.
pub fn simulate_removal_cycle(
    board: &mut Board,
    hands: &mut Hands,
    acting: Player,
    policy: &mut dyn RemovalPolicy,
    max_steps: usize,
) -> Vec<Removal> {
    let mut removals = Vec::new();

    loop {
        let surrounded = board.surrounded_tiles();
        if surrounded.is_empty() {
            break;
        }
        if removals.len() >= max_steps {
            tracing::warn!(
                "removal cascade stopped after {} steps with {} surrounded tiles left",
                max_steps,
                surrounded.len()
            );
            break;
        }

        let candidates = preferred_targets(board, &surrounded, acting);
        let target = policy
            .choose(board, &candidates, acting)
            .filter(|hex| candidates.contains(hex))
            .unwrap_or(candidates[0]);

        let Some(tile) = board.remove(target) else {
            break;
        };
        tracing::debug!("{} removes tile {} at ({}, {})", acting, tile.id, target.q, target.r);
        hands.get_mut(tile.owner).give_back(tile);
        removals.push(Removal { at: target, tile });
    }

    removals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::Hand;
    use crate::hex::ORIGIN;
    use crate::tile::{EdgePattern, Edge::Blank as B, Edge::Triangle as T, TileId};

    fn blank(id: TileId, owner: Player) -> Tile {
        Tile::new(id, owner, EdgePattern::from_edges([B; 6]))
    }

    /// Origin tile owned by `center`, ring owned by player one
    fn flower(center: Player) -> Board {
        let mut board = Board::new();
        board.insert(ORIGIN, blank(20, center));
        for (i, (_, n)) in ORIGIN.neighbors().enumerate() {
            board.insert(n, blank(i as TileId, Player::One));
        }
        board
    }

    fn empty_hands() -> Hands {
        Hands::new(Hand::default(), Hand::default())
    }

    #[test]
    fn test_cascade_removes_and_returns_to_hand() {
        let mut board = flower(Player::Two);
        let mut hands = empty_hands();
        let removals = simulate_removal_cycle(
            &mut board,
            &mut hands,
            Player::One,
            &mut FirstListed,
            MAX_REMOVAL_STEPS,
        );
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].at, ORIGIN);
        assert!(!board.is_occupied(ORIGIN));
        assert!(hands.get(Player::Two).contains(20));
        assert!(board.is_connected());
    }

    #[test]
    fn test_opponent_tiles_preferred() {
        let mut board = flower(Player::Two);
        // Make a player-one tile surrounded as well
        let east = ORIGIN.neighbor(2);
        for (i, (_, n)) in east.neighbors().enumerate() {
            if !board.is_occupied(n) {
                board.insert(n, blank(30 + i as TileId, Player::One));
            }
        }
        let surrounded = board.surrounded_tiles();
        assert_eq!(surrounded.len(), 2);
        assert_eq!(preferred_targets(&board, &surrounded, Player::One), vec![ORIGIN]);
        assert_eq!(preferred_targets(&board, &surrounded, Player::Two), vec![east]);
    }

    #[test]
    fn test_evaluative_removal_minimises_damage() {
        // Two surrounded player-one tiles; only the first one scores a point
        let mut board = Board::new();
        let a = ORIGIN;
        let b = ORIGIN.neighbor(2);
        let north = ORIGIN.neighbor(0);
        board.insert(a, Tile::new(40, Player::One, EdgePattern::from_edges([T, B, B, B, B, B])));
        let pattern = EdgePattern::from_edges([B, B, B, T, B, B]);
        board.insert(north, Tile::new(41, Player::One, pattern));
        board.insert(b, blank(42, Player::One));
        let mut id = 0;
        for hex in [a, b] {
            for (_, n) in hex.neighbors() {
                if !board.is_occupied(n) {
                    board.insert(n, blank(id, Player::One));
                    id += 1;
                }
            }
        }
        assert_eq!(crate::eval::score(&board, Player::One), 1);
        let candidates = board.surrounded_tiles();
        assert_eq!(candidates, vec![a, b]);

        let eval = EvalConfig::default();
        let mut policy = EvaluativeRemoval::new(&eval);
        assert_eq!(policy.choose(&board, &candidates, Player::One), Some(b));
    }

    #[test]
    fn test_cascade_respects_step_cap() {
        let mut board = flower(Player::Two);
        let mut hands = empty_hands();
        let removals =
            simulate_removal_cycle(&mut board, &mut hands, Player::One, &mut FirstListed, 0);
        assert!(removals.is_empty());
        assert!(board.is_occupied(ORIGIN));
    }
}
