//! Match command - play games between two difficulties
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_match(), report_results()
//! - Level 3: play_single_game(), compute_match_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use trihex_core::{
    ai::play_game, AiConfig, Difficulty, EngineConfig, GameMode, GameResult, GameState, Player,
    TrihexAi,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First contender's difficulty
    #[arg(long, default_value = "greedy")]
    pub p1: Difficulty,

    /// Second contender's difficulty
    #[arg(long, default_value = "medium")]
    pub p2: Difficulty,

    /// Number of games to play (will alternate who moves first)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Game mode (basic or moving)
    #[arg(long, default_value = "basic")]
    pub mode: GameMode,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game, from the contenders' point of view
#[derive(Clone, Debug, Serialize)]
struct GameRecord {
    game_number: usize,
    /// Whether the `--p1` contender moved first
    first_moved_first: bool,
    /// 1 or 2 for the contender that won, 0 for a draw or unfinished game
    winner: u8,
    turns: usize,
    first_score: u32,
    second_score: u32,
}

/// Aggregated match results
#[derive(Clone, Debug, Serialize)]
struct MatchResults {
    first: Difficulty,
    second: Difficulty,
    total_games: usize,
    first_wins: usize,
    second_wins: usize,
    draws: usize,
    avg_turns: f32,
    games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Play the match (games in parallel)
/// 2. Report results
pub fn run(args: MatchArgs, engine: EngineConfig, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting match: {} vs {} ({} games, {:?} mode)",
        args.p1,
        args.p2,
        args.games,
        args.mode
    );

    let results = play_match(&args, &engine, seed)?;

    report_results(&results, &args)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in the match
fn play_match(args: &MatchArgs, engine: &EngineConfig, seed: Option<u64>) -> Result<MatchResults> {
    let base_seed = seed.unwrap_or_else(rand::random);
    let progress = create_progress_bar(args.games as u64, args.json)?;

    let games = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let record = play_single_game(args, engine, i, base_seed.wrapping_add(i as u64 * 2));
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;

    progress.finish_and_clear();
    Ok(compute_match_statistics(args, games))
}

/// Report match results
fn report_results(results: &MatchResults, args: &MatchArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game; odd-numbered games swap who moves first
fn play_single_game(
    args: &MatchArgs,
    engine: &EngineConfig,
    index: usize,
    seed: u64,
) -> Result<GameRecord> {
    let first_moved_first = index % 2 == 0;
    let (one, two) = if first_moved_first {
        (args.p1, args.p2)
    } else {
        (args.p2, args.p1)
    };

    let config = |difficulty, seed| {
        AiConfig::new(difficulty)
            .with_engine(engine.clone())
            .with_seed(seed)
    };
    let mut player_one = TrihexAi::new(config(one, seed));
    let mut player_two = TrihexAi::new(config(two, seed.wrapping_add(1)));
    let state = GameState::new(args.mode).with_search_config(engine.search.clone());

    let (final_state, history) = play_game(&mut player_one, &mut player_two, state)?;

    let (p1_score, p2_score) = final_state.scores();
    let (first_score, second_score) = if first_moved_first {
        (p1_score, p2_score)
    } else {
        (p2_score, p1_score)
    };
    let winner = match final_state.result() {
        GameResult::Winner(player) => contender(player, first_moved_first),
        GameResult::Draw | GameResult::Ongoing => 0,
    };

    tracing::debug!("Game {}: {:?} ({} turns)", index + 1, final_state.result(), history.len());

    Ok(GameRecord {
        game_number: index + 1,
        first_moved_first,
        winner,
        turns: history.len(),
        first_score,
        second_score,
    })
}

/// Compute aggregate statistics from game records
fn compute_match_statistics(args: &MatchArgs, games: Vec<GameRecord>) -> MatchResults {
    let first_wins = games.iter().filter(|g| g.winner == 1).count();
    let second_wins = games.iter().filter(|g| g.winner == 2).count();
    let draws = games.len() - first_wins - second_wins;

    let total_turns: usize = games.iter().map(|g| g.turns).sum();
    let avg_turns = if games.is_empty() {
        0.0
    } else {
        total_turns as f32 / games.len() as f32
    };

    MatchResults {
        first: args.p1,
        second: args.p2,
        total_games: games.len(),
        first_wins,
        second_wins,
        draws,
        avg_turns,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Which contender (1 = `--p1`, 2 = `--p2`) was playing `player`
fn contender(player: Player, first_moved_first: bool) -> u8 {
    match (player, first_moved_first) {
        (Player::One, true) | (Player::Two, false) => 1,
        _ => 2,
    }
}

/// Hidden in JSON mode so stdout stays parseable
fn create_progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} games",
    )?);
    Ok(bar)
}

fn percent(n: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        100.0 * n as f32 / total as f32
    }
}

/// Print results as text
fn print_text_results(results: &MatchResults) {
    let total = results.total_games;

    println!("\n=== Match Results ===");
    println!("Total games: {}", total);
    println!(
        "{:<8} wins: {} ({:.1}%)",
        results.first.name(),
        results.first_wins,
        percent(results.first_wins, total)
    );
    println!(
        "{:<8} wins: {} ({:.1}%)",
        results.second.name(),
        results.second_wins,
        percent(results.second_wins, total)
    );
    println!("Draws:         {} ({:.1}%)", results.draws, percent(results.draws, total));
    println!("Avg turns:     {:.1}", results.avg_turns);
}

// ============================================================================
// TESTS
// ============================================================================
