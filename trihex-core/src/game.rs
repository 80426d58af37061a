//! Game state and turn flow

use crate::board::{Board, FrontierCache};
use crate::config::SearchConfig;
use crate::error::RuleError;
use crate::eval::{placement_delta, scores, EdgeMatch};
use crate::hand::Hand;
use crate::moves::{all_possible_moves, GameMode, Move};
use crate::position::Position;
use crate::removal::{Removal, RemovalPolicy};
use crate::rules::{edges_fit, is_relocation_valid};
use crate::tile::Player;
use serde::{Deserialize, Serialize};

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Ongoing,
    Winner(Player),
    Draw,
}

/// What happened during one turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub player: Player,
    /// `None` for a pass
    pub mv: Option<Move>,
    /// New connections made by the moved tile, before removals
    pub points: u32,
    pub matches: Vec<EdgeMatch>,
    pub removals: Vec<Removal>,
}

/// Game state
#[derive(Clone, Debug)]
pub struct GameState {
    position: Position,
    current: Player,
    mode: GameMode,
    /// Consecutive passes
    passes: u8,
    result: GameResult,
    search: SearchConfig,
    frontier: FrontierCache,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, full hands, player one to move
    pub fn new(mode: GameMode) -> Self {
        Self::from_position(Position::initial(), Player::One, mode)
    }

    /// Resume from an arbitrary position
    pub fn from_position(position: Position, current: Player, mode: GameMode) -> Self {
        Self {
            position,
            current,
            mode,
            passes: 0,
            result: GameResult::Ongoing,
            search: SearchConfig::default(),
            frontier: FrontierCache::default(),
        }
    }

    pub fn with_search_config(mut self, search: SearchConfig) -> Self {
        self.frontier = FrontierCache::with_capacity(search.frontier_cache_capacity);
        self.search = search;
        self
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn current_player(&self) -> Player {
        self.current
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn board(&self) -> &Board {
        &self.position.board
    }

    pub fn hand(&self, player: Player) -> &Hand {
        self.position.hand(player)
    }

    /// (player one, player two)
    pub fn scores(&self) -> (u32, u32) {
        scores(&self.position.board)
    }

    // ========================================================================
    // MOVES
    // ========================================================================

    /// All legal moves for the player to move
    pub fn legal_moves(&mut self) -> Vec<Move> {
        if self.result != GameResult::Ongoing {
            return Vec::new();
        }
        all_possible_moves(
            &self.position.board,
            self.position.hand(self.current),
            self.current,
            self.mode,
            &mut self.frontier,
        )
    }

    /// Check a move against every rule without applying it
    pub fn validate(&mut self, mv: Move) -> Result<(), RuleError> {
        if self.result != GameResult::Ongoing {
            return Err(RuleError::GameOver);
        }
        if mv.orientation() >= 6 {
            return Err(RuleError::InvalidOrientation(mv.orientation()));
        }
        let board = &self.position.board;

        match mv {
            Move::Place { tile, orientation, to } => {
                let placed = self
                    .position
                    .hand(self.current)
                    .get(tile)
                    .ok_or(RuleError::TileNotInHand(tile))?
                    .with_orientation(orientation);
                if board.is_occupied(to) {
                    return Err(RuleError::CellOccupied { q: to.q, r: to.r });
                }
                let legal = if board.is_empty() {
                    to == crate::hex::ORIGIN
                } else {
                    self.frontier.outside_empty_cells(board).contains(&to)
                        && edges_fit(&placed, to, board)
                };
                if !legal {
                    return Err(RuleError::IllegalPlacement { tile, q: to.q, r: to.r });
                }
            }
            Move::Relocate { tile, orientation, from, to } => {
                if self.mode != GameMode::Moving {
                    return Err(RuleError::RelocationDisabled);
                }
                match board.get(from) {
                    Some(t) if t.id == tile && t.owner == self.current => {}
                    Some(t) if t.id == tile => return Err(RuleError::NotYourTile(tile)),
                    _ => return Err(RuleError::TileNotOnBoard(tile)),
                }
                if !is_relocation_valid(board, from, to, orientation) {
                    return Err(RuleError::IllegalRelocation { tile, q: to.q, r: to.r });
                }
            }
        }
        Ok(())
    }

    /// Apply a move, resolve removals with `policy`, and hand the turn over
    ///
    /// Nothing changes when the move is rejected.
    pub fn apply_move(
        &mut self,
        mv: Move,
        policy: &mut dyn RemovalPolicy,
    ) -> Result<TurnReport, RuleError> {
        self.validate(mv)?;
        let mover = self.current;

        self.position.play(mv, mover)?;
        let (points, matches) = placement_delta(&self.position.board, mv.destination());
        let removals = self
            .position
            .resolve_removals(mover, policy, self.search.max_removal_steps);
        self.frontier.clear();
        self.passes = 0;

        if self.position.hand(mover).is_empty() {
            self.finish();
        }
        self.current = mover.opponent();

        Ok(TurnReport {
            player: mover,
            mv: Some(mv),
            points,
            matches,
            removals,
        })
    }

    /// Pass the turn. Only allowed with no legal move; two in a row end the game.
    pub fn pass(&mut self) -> Result<TurnReport, RuleError> {
        if self.result != GameResult::Ongoing {
            return Err(RuleError::GameOver);
        }
        if !self.legal_moves().is_empty() {
            return Err(RuleError::PassNotAllowed);
        }
        let mover = self.current;
        self.passes += 1;
        if self.passes >= 2 {
            self.finish();
        }
        self.current = mover.opponent();

        Ok(TurnReport {
            player: mover,
            mv: None,
            points: 0,
            matches: Vec::new(),
            removals: Vec::new(),
        })
    }

    fn finish(&mut self) {
        let (one, two) = self.scores();
        self.result = match one.cmp(&two) {
            std::cmp::Ordering::Greater => GameResult::Winner(Player::One),
            std::cmp::Ordering::Less => GameResult::Winner(Player::Two),
            std::cmp::Ordering::Equal => GameResult::Draw,
        };
        tracing::info!("game over: {:?} ({} - {})", self.result, one, two);
    }
}

// ============================================================================
// TESTS
// ============================================================================
