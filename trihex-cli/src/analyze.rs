//! Analyze command - search a snapshot file and print the chosen move
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_request(), search(), report_analysis()
//! - Level 3: (delegated to trihex-core)

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use trihex_core::{
    all_possible_moves, scores, AiConfig, Difficulty, EngineConfig, FrontierCache, MoveRequest,
    MoveResponse, Player, Position, SearchStats, TrihexAi,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Move request JSON (board, ownHand, opponentHand, actingPlayerId, ...)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Override the difficulty in the snapshot
    #[arg(long)]
    pub difficulty: Option<Difficulty>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Analysis {
    acting_player_id: u8,
    difficulty: Difficulty,
    legal_moves: usize,
    player1_score: u32,
    player2_score: u32,
    #[serde(rename = "move")]
    chosen: MoveResponse,
    score: Option<i32>,
    stats: SearchStats,
    elapsed_ms: u128,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run analyze command
///
/// 1. Load and validate the snapshot
/// 2. Search it
/// 3. Report the move and search counters
pub fn run(args: AnalyzeArgs, engine: EngineConfig, seed: Option<u64>) -> Result<()> {
    let request = load_request(&args.snapshot)?;
    let difficulty = args.difficulty.unwrap_or(request.difficulty);

    let analysis = search(&request, difficulty, engine, seed)?;

    report_analysis(&analysis, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn load_request(path: &Path) -> Result<MoveRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    let request = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;
    Ok(request)
}

fn search(
    request: &MoveRequest,
    difficulty: Difficulty,
    engine: EngineConfig,
    seed: Option<u64>,
) -> Result<Analysis> {
    let (position, acting) = request.to_position().context("Invalid snapshot")?;
    let legal_moves = count_legal_moves(&position, acting, request);
    let (player1_score, player2_score) = scores(&position.board);

    let mut config = AiConfig::new(difficulty).with_engine(engine);
    config.seed = seed;
    let mut ai = TrihexAi::new(config);

    let start = Instant::now();
    let outcome = ai.choose_move(&position, acting, request.mode)?;
    let elapsed = start.elapsed();

    tracing::info!(
        "{} search over {} moves took {}",
        difficulty,
        legal_moves,
        format_duration(elapsed)
    );

    Ok(Analysis {
        acting_player_id: acting.id(),
        difficulty,
        legal_moves,
        player1_score,
        player2_score,
        chosen: MoveResponse::from(outcome.map(|o| o.mv)),
        score: outcome.map(|o| o.score),
        stats: ai.stats(),
        elapsed_ms: elapsed.as_millis(),
    })
}

fn report_analysis(analysis: &Analysis, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
        return Ok(());
    }

    println!("\n=== Analysis ===");
    println!("Acting player:  {}", analysis.acting_player_id);
    println!("Difficulty:     {}", analysis.difficulty);
    println!("Scores:         P1 {} - {} P2", analysis.player1_score, analysis.player2_score);
    println!("Legal moves:    {}", analysis.legal_moves);
    match analysis.chosen.to_move() {
        Some(mv) => println!("Chosen move:    {}", mv),
        None => println!("Chosen move:    pass"),
    }
    if let Some(score) = analysis.score {
        println!("Search score:   {}", score);
    }
    println!("Horizon nodes:  {}", analysis.stats.horizon_nodes);
    println!("Cutoffs:        {}", analysis.stats.cutoffs);
    println!("Time:           {} ms", analysis.elapsed_ms);
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn count_legal_moves(position: &Position, acting: Player, request: &MoveRequest) -> usize {
    all_possible_moves(
        &position.board,
        position.hand(acting),
        acting,
        request.mode,
        &mut FrontierCache::new(),
    )
    .len()
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 {
        format!("{:.2}s", d.as_secs_f64())
    } else {
        format!("{}ms", d.as_millis())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use trihex_core::GameMode;

    #[test]
    fn test_search_opening_snapshot() {
        let request = MoveRequest::from_position(
            &Position::initial(),
            Player::One,
            GameMode::Basic,
            Difficulty::Greedy,
        );
        let analysis =
            search(&request, Difficulty::Greedy, EngineConfig::default(), Some(1)).unwrap();
        assert_eq!(analysis.acting_player_id, 1);
        assert!(analysis.legal_moves > 0);
        match analysis.chosen {
            MoveResponse::Place { x, y, .. } => assert_eq!((x, y), (0, 0)),
            other => panic!("expected a placement, got {other:?}"),
        }
        assert_eq!(analysis.stats.horizon_nodes as usize, analysis.legal_moves);
    }

    #[test]
    fn test_load_request_missing_file() {
        assert!(load_request(Path::new("/nonexistent/snapshot.json")).is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
