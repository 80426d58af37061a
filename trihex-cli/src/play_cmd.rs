//! Play command - one AI-vs-AI game with a move log
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: create_players(), play_out(), report_game()
//! - Level 3: describe_turn()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;

use trihex_core::{
    ai::play_game, AiConfig, Difficulty, EngineConfig, GameMode, GameResult, GameState, Player,
    TrihexAi, TurnReport,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Player one difficulty (random, greedy, medium, hard)
    #[arg(long, default_value = "medium")]
    pub p1: Difficulty,

    /// Player two difficulty
    #[arg(long, default_value = "medium")]
    pub p2: Difficulty,

    /// Game mode (basic or moving)
    #[arg(long, default_value = "basic")]
    pub mode: GameMode,

    /// Print the turn log as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Create both players
/// 2. Play until the game ends
/// 3. Print the log and result
pub fn run(args: PlayArgs, engine: EngineConfig, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Playing {} vs {} ({:?} mode)",
        args.p1,
        args.p2,
        args.mode
    );

    let (mut one, mut two) = create_players(&args, &engine, seed);
    let (state, history) = play_out(&mut one, &mut two, &args, &engine)?;

    report_game(&state, &history, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Player two gets the next seed so the two never mirror each other
fn create_players(
    args: &PlayArgs,
    engine: &EngineConfig,
    seed: Option<u64>,
) -> (TrihexAi, TrihexAi) {
    let config = |difficulty, offset: u64| {
        let mut config = AiConfig::new(difficulty).with_engine(engine.clone());
        config.seed = seed.map(|s| s.wrapping_add(offset));
        config
    };
    (
        TrihexAi::new(config(args.p1, 0)),
        TrihexAi::new(config(args.p2, 1)),
    )
}

fn play_out(
    one: &mut TrihexAi,
    two: &mut TrihexAi,
    args: &PlayArgs,
    engine: &EngineConfig,
) -> Result<(GameState, Vec<TurnReport>)> {
    let state = GameState::new(args.mode).with_search_config(engine.search.clone());
    let (state, history) = play_game(one, two, state)?;
    Ok((state, history))
}

fn report_game(state: &GameState, history: &[TurnReport], json: bool) -> Result<()> {
    let (p1, p2) = state.scores();

    if json {
        let output = serde_json::json!({
            "result": state.result(),
            "scores": { "player1": p1, "player2": p2 },
            "turns": history,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (i, report) in history.iter().enumerate() {
        println!("{:>3}. {}", i + 1, describe_turn(report));
    }
    println!("\n=== Game Over ===");
    println!("Turns:   {}", history.len());
    println!("Score:   P1 {} - {} P2", p1, p2);
    println!("Result:  {}", format_result(state.result()));
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One log line for a turn
pub fn describe_turn(report: &TurnReport) -> String {
    let mut line = match report.mv {
        Some(mv) => format!("{} {}", report.player, mv),
        None => format!("{} passes", report.player),
    };
    if report.points > 0 {
        line.push_str(&format!("  +{}", report.points));
    }
    for removal in &report.removals {
        line.push_str(&format!(
            "  [removed #{} ({}) at ({}, {})]",
            removal.tile.id, removal.tile.owner, removal.at.q, removal.at.r
        ));
    }
    line
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_result(result: GameResult) -> String {
    match result {
        GameResult::Winner(Player::One) => "Player 1 wins".to_string(),
        GameResult::Winner(Player::Two) => "Player 2 wins".to_string(),
        GameResult::Draw => "Draw".to_string(),
        GameResult::Ongoing => "Unfinished (turn limit)".to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trihex_core::{Move, ORIGIN};

    #[test]
    fn test_describe_turn() {
        let report = TurnReport {
            player: Player::One,
            mv: Some(Move::Place { tile: 3, orientation: 2, to: ORIGIN }),
            points: 2,
            matches: Vec::new(),
            removals: Vec::new(),
        };
        assert_eq!(describe_turn(&report), "P1 place #3 r2 @ (0, 0)  +2");

        let pass = TurnReport { mv: None, points: 0, player: Player::Two, ..report };
        assert_eq!(describe_turn(&pass), "P2 passes");
    }

    #[test]
    fn test_seeded_players_differ() {
        let args = PlayArgs {
            p1: Difficulty::Random,
            p2: Difficulty::Hard,
            mode: GameMode::Moving,
            json: false,
        };
        let (one, two) = create_players(&args, &EngineConfig::default(), Some(9));
        assert_eq!(one.difficulty, Difficulty::Random);
        assert_eq!(two.difficulty, Difficulty::Hard);
    }

    #[test]
    fn test_format_result() {
        assert_eq!(format_result(GameResult::Draw), "Draw");
        assert_eq!(format_result(GameResult::Winner(Player::Two)), "Player 2 wins");
    }
}
