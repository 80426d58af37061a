//! Engine and AI configuration

use crate::eval::EvalConfig;
use crate::removal::MAX_REMOVAL_STEPS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// AI strength
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Uniformly random legal move
    Random,
    /// Best immediate score differential
    Greedy,
    /// Minimax, one ply
    #[default]
    Medium,
    /// Minimax, three plies
    Hard,
}

impl Difficulty {
    /// Search plies (0 for the non-searching tiers)
    pub fn depth(self) -> u32 {
        match self {
            Difficulty::Random | Difficulty::Greedy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Random => "random",
            Difficulty::Greedy => "greedy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Difficulty::Random),
            "greedy" => Ok(Difficulty::Greedy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!(
                "unknown difficulty '{other}' (expected random, greedy, medium or hard)"
            )),
        }
    }
}

/// Search behaviour
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Alpha-beta pruning (never changes the chosen score)
    pub pruning: bool,
    /// Cap on removal cascade length
    pub max_removal_steps: usize,
    /// Entries kept by the frontier cache
    pub frontier_cache_capacity: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            pruning: true,
            max_removal_steps: MAX_REMOVAL_STEPS,
            frontier_cache_capacity: crate::board::FRONTIER_CACHE_CAPACITY,
        }
    }
}

/// Everything tunable about rules resolution and search
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub eval: EvalConfig,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// AI player configuration
#[derive(Clone, Debug, Default)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
    pub engine: EngineConfig,
}

impl AiConfig {
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Default::default()
        }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set engine configuration
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_depths() {
        assert_eq!(Difficulty::Greedy.depth(), 0);
        assert_eq!(Difficulty::Medium.depth(), 1);
        assert_eq!(Difficulty::Hard.depth(), 3);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_engine_config_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "eval": { "empty_board_penalty": 250 } }"#).unwrap();
        assert_eq!(config.eval.empty_board_penalty, 250);
        assert_eq!(config.eval.hand_exhaustion_bonus, 1000);
        assert!(config.search.pruning);
        assert_eq!(config.search.max_removal_steps, 10);
    }

    #[test]
    fn test_ai_config_builder() {
        let config = AiConfig::new(Difficulty::Hard).with_seed(7);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.engine, EngineConfig::default());
    }
}
