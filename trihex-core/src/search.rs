//! Move search: random, greedy and minimax with alpha-beta
//!
//! Every ply is one player's whole turn: the move plus the removal cascade
//! it triggers, resolved with [`EvaluativeRemoval`] for the mover. Each
//! branch works on its own clone of the position.

use crate::board::FrontierCache;
use crate::config::EngineConfig;
use crate::error::SearchError;
use crate::eval::{evaluate, score_differential};
use crate::moves::{all_possible_moves, GameMode, Move};
use crate::position::Position;
use crate::removal::EvaluativeRemoval;
use crate::tile::Player;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// TYPES
// ============================================================================

/// Diagnostic counters, no effect on play
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes scored statically
    pub horizon_nodes: u64,
    /// Alpha-beta cutoffs
    pub cutoffs: u64,
}

/// Advisory progress events
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SearchEvent {
    /// A root move is being evaluated
    Evaluating { mv: Move },
    /// Root evaluation finished
    HighlightCleared,
}

/// Receives [`SearchEvent`]s. Must not block.
pub trait SearchObserver: Send {
    fn on_event(&mut self, event: SearchEvent);
}

/// Chosen move with its score and the counters gathered finding it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub mv: Move,
    pub score: i32,
    pub stats: SearchStats,
}

// ============================================================================
// SEARCHER
// ============================================================================

/// Search state: RNG, frontier cache, counters, cancellation and observer
pub struct Searcher {
    config: EngineConfig,
    rng: ChaCha8Rng,
    cache: FrontierCache,
    stats: SearchStats,
    cancel: Option<Arc<AtomicBool>>,
    observer: Option<Box<dyn SearchObserver>>,
}

impl Searcher {
    pub fn new(config: EngineConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let cache = FrontierCache::with_capacity(config.search.frontier_cache_capacity);
        Self {
            config,
            rng,
            cache,
            stats: SearchStats::default(),
            cancel: None,
            observer: None,
        }
    }

    /// Abort with [`SearchError::Cancelled`] once `flag` is raised
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn SearchObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Counters from the most recent search
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Legal moves for `player`
    pub fn legal_moves(
        &mut self,
        position: &Position,
        player: Player,
        mode: GameMode,
    ) -> Vec<Move> {
        all_possible_moves(
            &position.board,
            position.hand(player),
            player,
            mode,
            &mut self.cache,
        )
    }

    /// Position after `mover` plays `mv` and the cascade settles
    pub fn simulate(
        &self,
        position: &Position,
        mv: Move,
        mover: Player,
    ) -> Result<Position, SearchError> {
        let mut next = position.clone();
        next.play(mv, mover)?;
        let mut policy = EvaluativeRemoval::new(&self.config.eval);
        next.resolve_removals(mover, &mut policy, self.config.search.max_removal_steps);
        Ok(next)
    }

    fn check_cancelled(&self) -> Result<(), SearchError> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(SearchError::Cancelled),
            _ => Ok(()),
        }
    }

    fn notify(&mut self, event: SearchEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(event);
        }
    }

    /// Pick uniformly among `tied`
    fn pick<T: Copy>(&mut self, tied: &[T]) -> Option<T> {
        tied.choose(&mut self.rng).copied()
    }

    // ========================================================================
    // RANDOM
    // ========================================================================

    /// Uniformly random legal move
    pub fn random_move(
        &mut self,
        position: &Position,
        player: Player,
        mode: GameMode,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        self.stats = SearchStats::default();
        let moves = self.legal_moves(position, player, mode);
        let Some(mv) = self.pick(&moves) else {
            return Ok(None);
        };
        let child = self.simulate(position, mv, player)?;
        Ok(Some(SearchOutcome {
            mv,
            score: score_differential(&child.board, player),
            stats: self.stats,
        }))
    }

    // ========================================================================
    // GREEDY
    // ========================================================================

    /// Best score differential after one turn, ties broken at random
    pub fn greedy_move(
        &mut self,
        position: &Position,
        player: Player,
        mode: GameMode,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        self.stats = SearchStats::default();
        let moves = self.legal_moves(position, player, mode);

        let mut best_score = i32::MIN;
        let mut tied = Vec::new();
        for mv in moves {
            self.check_cancelled()?;
            let child = self.simulate(position, mv, player)?;
            self.stats.horizon_nodes += 1;
            let score = score_differential(&child.board, player);
            if score > best_score {
                best_score = score;
                tied.clear();
            }
            if score == best_score {
                tied.push(mv);
            }
        }

        Ok(self.pick(&tied).map(|mv| SearchOutcome {
            mv,
            score: best_score,
            stats: self.stats,
        }))
    }

    // ========================================================================
    // MINIMAX WITH ALPHA-BETA
    // ========================================================================

    /// Minimax over `depth` plies with a two-level tie-break at the root
    ///
    /// Root moves tied on minimax value are re-ranked by the immediate swing
    /// in score differential; the final pick is uniform among those tied again.
    pub fn minimax_move(
        &mut self,
        position: &Position,
        player: Player,
        mode: GameMode,
        depth: u32,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        if depth == 0 {
            return self.greedy_move(position, player, mode);
        }
        self.stats = SearchStats::default();
        self.check_cancelled()?;

        let moves = self.legal_moves(position, player, mode);
        if moves.is_empty() {
            return Ok(None);
        }

        let mut best_score = i32::MIN;
        let mut tied: Vec<(Move, Position)> = Vec::new();

        for mv in moves {
            self.notify(SearchEvent::Evaluating { mv });
            let child = self.simulate(position, mv, player)?;

            let score = if child.hand(player).is_empty() {
                self.stats.horizon_nodes += 1;
                evaluate(&child.board, player, &self.config.eval)
                    + self.config.eval.hand_exhaustion_bonus
            } else {
                // Scores are integers: a window one below the best keeps ties exact
                let alpha = if self.config.search.pruning && best_score > i32::MIN {
                    best_score - 1
                } else {
                    i32::MIN
                };
                self.minimax(&child, depth - 1, alpha, i32::MAX, false, player, mode)?
            };

            if score > best_score {
                best_score = score;
                tied.clear();
            }
            if score == best_score {
                tied.push((mv, child));
            }
        }
        self.notify(SearchEvent::HighlightCleared);

        let before = score_differential(&position.board, player);
        let swings: Vec<(Move, i32)> = tied
            .iter()
            .map(|(mv, child)| (*mv, score_differential(&child.board, player) - before))
            .collect();
        let best_swing = swings.iter().map(|&(_, s)| s).max().unwrap_or(0);
        let finalists: Vec<Move> = swings
            .into_iter()
            .filter(|&(_, s)| s == best_swing)
            .map(|(mv, _)| mv)
            .collect();

        tracing::debug!(
            "minimax depth {}: score {}, {} tied, {} after swing, {} horizon nodes, {} cutoffs",
            depth,
            best_score,
            tied.len(),
            finalists.len(),
            self.stats.horizon_nodes,
            self.stats.cutoffs
        );

        Ok(self.pick(&finalists).map(|mv| SearchOutcome {
            mv,
            score: best_score,
            stats: self.stats,
        }))
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        position: &Position,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        root: Player,
        mode: GameMode,
    ) -> Result<i32, SearchError> {
        self.check_cancelled()?;

        if depth == 0 {
            self.stats.horizon_nodes += 1;
            return Ok(evaluate(&position.board, root, &self.config.eval));
        }

        let mover = if maximizing { root } else { root.opponent() };
        let moves = self.legal_moves(position, mover, mode);
        if moves.is_empty() {
            self.stats.horizon_nodes += 1;
            return Ok(evaluate(&position.board, root, &self.config.eval));
        }

        let bonus = self.config.eval.hand_exhaustion_bonus;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for mv in moves {
            let child = self.simulate(position, mv, mover)?;

            let value = if child.hand(mover).is_empty() {
                self.stats.horizon_nodes += 1;
                let base = evaluate(&child.board, root, &self.config.eval);
                if maximizing {
                    base + bonus
                } else {
                    base - bonus
                }
            } else {
                self.minimax(&child, depth - 1, alpha, beta, !maximizing, root, mode)?
            };

            if maximizing {
                best = best.max(value);
                alpha = alpha.max(value);
            } else {
                best = best.min(value);
                beta = beta.min(value);
            }

            if self.config.search.pruning && beta <= alpha {
                self.stats.cutoffs += 1;
                break;
            }
        }

        Ok(best)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::SearchConfig;
    use crate::hand::{Hand, Hands};
    use crate::hex::{Hex, ORIGIN};
    use crate::tile::{EdgePattern, Tile, Edge::Blank as B, Edge::Triangle as T};

    fn searcher(pruning: bool) -> Searcher {
        let config = EngineConfig {
            search: SearchConfig {
                pruning,
                ..SearchConfig::default()
            },
            ..EngineConfig::default()
        };
        Searcher::new(config, Some(7))
    }

    /// Small position: one tile on the board, a few tiles in each hand
    fn small_position() -> Position {
        let mut board = Board::new();
        let pattern = EdgePattern::from_edges([T, B, T, B, B, B]);
        board.insert(ORIGIN, Tile::new(0, Player::One, pattern));
        let one = Hand::new(
            [1u8, 5, 9]
                .iter()
                .filter_map(|&id| Hand::full(Player::One).get(id).copied()),
        );
        let two = Hand::new(
            [15u8, 19, 23]
                .iter()
                .filter_map(|&id| Hand::full(Player::Two).get(id).copied()),
        );
        Position::new(board, Hands::new(one, two))
    }

    #[test]
    fn test_no_moves_returns_none() {
        let position = Position::new(Board::new(), Hands::default());
        let mut s = searcher(true);
        assert_eq!(s.random_move(&position, Player::One, GameMode::Basic).unwrap(), None);
        assert_eq!(s.greedy_move(&position, Player::One, GameMode::Basic).unwrap(), None);
        assert_eq!(s.minimax_move(&position, Player::One, GameMode::Basic, 3).unwrap(), None);
    }

    #[test]
    fn test_greedy_takes_the_point() {
        // A lone triangle tile; only a facing triangle scores
        let mut board = Board::new();
        let one_triangle = EdgePattern::from_edges([T, B, B, B, B, B]);
        board.insert(ORIGIN, Tile::new(0, Player::One, one_triangle));
        let hand = Hand::new([Tile::new(1, Player::One, one_triangle)]);
        let position = Position::new(board, Hands::new(hand, Hand::default()));

        let mut s = searcher(true);
        let outcome = s.greedy_move(&position, Player::One, GameMode::Basic).unwrap().unwrap();
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.mv, Move::Place { tile: 1, orientation: 3, to: Hex::new(0, -1) });
    }

    #[test]
    fn test_pruning_never_changes_score() {
        let position = small_position();
        for depth in [1, 3] {
            let pruned = searcher(true)
                .minimax_move(&position, Player::Two, GameMode::Basic, depth)
                .unwrap()
                .unwrap();
            let full = searcher(false)
                .minimax_move(&position, Player::Two, GameMode::Basic, depth)
                .unwrap()
                .unwrap();
            assert_eq!(pruned.score, full.score, "depth {depth}");
            assert!(pruned.stats.horizon_nodes <= full.stats.horizon_nodes);
            assert_eq!(full.stats.cutoffs, 0);
        }
    }

    #[test]
    fn test_minimax_prefers_emptying_hand() {
        // One tile left: any legal placement ends the hand and earns the bonus
        let mut board = Board::new();
        board.insert(ORIGIN, Tile::new(0, Player::One, EdgePattern::from_edges([B; 6])));
        let hand = Hand::new([Tile::new(1, Player::One, EdgePattern::from_edges([B; 6]))]);
        let position = Position::new(board, Hands::new(hand, Hand::full(Player::Two)));
        let outcome = searcher(true)
            .minimax_move(&position, Player::One, GameMode::Basic, 3)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.score, 1000);
    }

    #[test]
    fn test_cancelled_search() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut s = searcher(true).with_cancel_flag(flag);
        let err = s
            .minimax_move(&small_position(), Player::One, GameMode::Basic, 1)
            .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
    }

    struct Recorder(Arc<std::sync::Mutex<Vec<SearchEvent>>>);

    impl SearchObserver for Recorder {
        fn on_event(&mut self, event: SearchEvent) {
            if let Ok(mut events) = self.0.lock() {
                events.push(event);
            }
        }
    }

    #[test]
    fn test_observer_sees_root_moves() {
        let events = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut s = searcher(true).with_observer(Box::new(Recorder(Arc::clone(&events))));
        s.minimax_move(&small_position(), Player::One, GameMode::Basic, 1)
            .unwrap()
            .unwrap();
        let events = events.lock().unwrap();
        assert!(matches!(events.first(), Some(SearchEvent::Evaluating { .. })));
        assert_eq!(events.last(), Some(&SearchEvent::HighlightCleared));
    }
}
