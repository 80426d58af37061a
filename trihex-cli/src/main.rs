//! TRIHEX CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single AI-vs-AI game with a move log
//! - match: Play many games in parallel and report win rates
//! - analyze: Search a snapshot file and print the chosen move
//! - serve: Start the HTTP server

mod analyze;
mod match_cmd;
mod play_cmd;
mod server;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use trihex_core::EngineConfig;

#[derive(Parser)]
#[command(name = "trihex")]
#[command(about = "TRIHEX tile placement game engine")]
struct Cli {
    /// Engine configuration JSON (evaluation constants, search options)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Random seed for reproducible play
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game between two AI players
    Play(play_cmd::PlayArgs),
    /// Play a match of many games
    Match(match_cmd::MatchArgs),
    /// Choose a move for a snapshot file
    Analyze(analyze::AnalyzeArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let engine = load_engine_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, engine, cli.seed),
        Commands::Match(args) => match_cmd::run(args, engine, cli.seed),
        Commands::Analyze(args) => analyze::run(args, engine, cli.seed),
        Commands::Serve(args) => server::run(args, engine, cli.seed),
    }
}

/// Defaults unless a config file is given
fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let config = EngineConfig::load(path)
                .with_context(|| format!("Failed to load engine config: {}", path.display()))?;
            tracing::info!("Loaded engine config from {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}
