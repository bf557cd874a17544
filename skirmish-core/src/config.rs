//! Engine configuration

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::SkirmishError;
use crate::eval::Heuristics;

/// Search configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies to search (one ply = one side's joint action)
    pub depth: u32,
    /// Evaluation weights
    pub heuristics: Heuristics,
    /// Alpha-beta cutoffs; off means exhaustive minimax
    pub pruning: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 4,
            heuristics: Heuristics::default(),
            pruning: true,
        }
    }
}

impl EngineConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Disable pruning (reference minimax)
    pub fn without_pruning(mut self) -> Self {
        self.pruning = false;
        self
    }

    /// Reject settings the search cannot run with
    pub fn validate(&self) -> Result<(), SkirmishError> {
        if self.depth == 0 {
            return Err(SkirmishError::InvalidDepth(self.depth));
        }
        Ok(())
    }

    /// Load from JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.depth, 4);
        assert!(config.pruning);
        assert_eq!(config.heuristics, Heuristics::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let h = Heuristics {
            attack_bonus: 900,
            ..Default::default()
        };
        let config = EngineConfig::alpha_beta(6).with_heuristics(h.clone()).without_pruning();
        assert_eq!(config.depth, 6);
        assert_eq!(config.heuristics, h);
        assert!(!config.pruning);
    }

    #[test]
    fn test_zero_depth_invalid() {
        assert_eq!(
            EngineConfig::alpha_beta(0).validate(),
            Err(SkirmishError::InvalidDepth(0))
        );
    }

    #[test]
    fn test_partial_json() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "depth": 2, "heuristics": { "ranged_health_weight": 3 } }"#).unwrap();
        assert_eq!(config.depth, 2);
        assert!(config.pruning);
        assert_eq!(config.heuristics.attack_bonus, 500);
        assert_eq!(config.heuristics.ranged_health_weight, 3);
    }

    #[test]
    fn test_load_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/skirmish.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
