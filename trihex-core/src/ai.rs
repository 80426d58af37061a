//! AI players: move and removal selection per difficulty

use crate::board::Board;
use crate::config::{AiConfig, Difficulty};
use crate::error::SearchError;
use crate::game::{GameResult, GameState, TurnReport};
use crate::hex::Hex;
use crate::moves::{GameMode, Move};
use crate::position::Position;
use crate::removal::{preferred_targets, rank_removals, RemovalPolicy};
use crate::search::{SearchObserver, SearchOutcome, SearchStats, Searcher};
use crate::tile::Player;
use rand::prelude::*;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Safety limit on turns in a self-play game
const MAX_TURNS: usize = 200;

/// AI player
pub struct TrihexAi {
    pub difficulty: Difficulty,
    searcher: Searcher,
}

impl TrihexAi {
    pub fn new(config: AiConfig) -> Self {
        Self {
            difficulty: config.difficulty,
            searcher: Searcher::new(config.engine, config.seed),
        }
    }

    pub fn with_seed(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(AiConfig::new(difficulty).with_seed(seed))
    }

    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.searcher = self.searcher.with_cancel_flag(flag);
        self
    }

    pub fn with_observer(mut self, observer: Box<dyn SearchObserver>) -> Self {
        self.searcher = self.searcher.with_observer(observer);
        self
    }

    /// Counters from the most recent search
    pub fn stats(&self) -> SearchStats {
        self.searcher.stats()
    }

    /// Choose a move for `player`; `None` when there is nothing legal
    pub fn choose_move(
        &mut self,
        position: &Position,
        player: Player,
        mode: GameMode,
    ) -> Result<Option<SearchOutcome>, SearchError> {
        match self.difficulty {
            Difficulty::Random => self.searcher.random_move(position, player, mode),
            Difficulty::Greedy => self.searcher.greedy_move(position, player, mode),
            Difficulty::Medium | Difficulty::Hard => {
                self.searcher
                    .minimax_move(position, player, mode, self.difficulty.depth())
            }
        }
    }

    /// Get best move for the player to move in `state`
    pub fn best_move(&mut self, state: &GameState) -> Result<Option<Move>, SearchError> {
        let outcome = self.choose_move(state.position(), state.current_player(), state.mode())?;
        Ok(outcome.map(|o| o.mv))
    }

    /// Choose which surrounded tile to remove for `acting`
    pub fn select_removal(
        &mut self,
        board: &Board,
        surrounded: &[Hex],
        acting: Player,
    ) -> Option<Hex> {
        let candidates = preferred_targets(board, surrounded, acting);
        match self.difficulty {
            Difficulty::Random => candidates.choose(self.searcher.rng()).copied(),
            Difficulty::Greedy => candidates.first().copied(),
            Difficulty::Medium | Difficulty::Hard => {
                let eval = &self.searcher.config().eval;
                let ranked = rank_removals(board, &candidates, acting, eval);
                let best = ranked.iter().map(|&(_, v)| v).max()?;
                let tied: Vec<Hex> = ranked
                    .into_iter()
                    .filter(|&(_, v)| v == best)
                    .map(|(hex, _)| hex)
                    .collect();
                tied.choose(self.searcher.rng()).copied()
            }
        }
    }

    /// Play out a game from `state`, this AI for player one and `other` for player two
    pub fn play_game(
        &mut self,
        other: &mut TrihexAi,
        state: GameState,
    ) -> Result<(GameState, Vec<TurnReport>), SearchError> {
        play_game(self, other, state)
    }
}

impl RemovalPolicy for TrihexAi {
    fn choose(&mut self, board: &Board, candidates: &[Hex], acting: Player) -> Option<Hex> {
        self.select_removal(board, candidates, acting)
    }
}

/// Play a game between two AIs until it ends or the turn limit is hit
pub fn play_game(
    one: &mut TrihexAi,
    two: &mut TrihexAi,
    mut state: GameState,
) -> Result<(GameState, Vec<TurnReport>), SearchError> {
    let mut history = Vec::new();

    while state.result() == GameResult::Ongoing && history.len() < MAX_TURNS {
        let ai = match state.current_player() {
            Player::One => &mut *one,
            Player::Two => &mut *two,
        };
        let report = match ai.best_move(&state)? {
            Some(mv) => state.apply_move(mv, ai)?,
            None => state.pass()?,
        };
        tracing::debug!(
            "{} ({}): {}",
            report.player,
            ai.difficulty,
            report.mv.map(|m| m.to_string()).unwrap_or_else(|| "pass".to_string())
        );
        history.push(report);
    }

    Ok((state, history))
}
