//! State evaluation

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::state::CombatState;

/// Heuristic score, from the melee (maximizing) side's point of view
pub type Score = i64;

/// Weights for the linear evaluation.
///
/// The attack bonus and distance weight form the baseline. The remaining
/// terms are tunable extensions and default to zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Heuristics {
    /// Added per footman that attacked in the joint action producing the state
    pub attack_bonus: Score,
    /// Multiplies each non-attacking footman's path length to the nearest archer
    pub distance_weight: Score,
    /// Added per point of footman health
    pub melee_health_weight: Score,
    /// Subtracted per point of archer health
    pub ranged_health_weight: Score,
    /// Subtracted per archer that attacked
    pub ranged_attack_penalty: Score,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            attack_bonus: 500,
            distance_weight: 1,
            melee_health_weight: 0,
            ranged_health_weight: 0,
            ranged_attack_penalty: 0,
        }
    }
}

impl Heuristics {
    /// Load weights from JSON file. Missing weights take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read heuristics: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse heuristics: {}", path.display()))
    }
}

/// Evaluate a state for the melee side.
///
/// Each footman contributes the attack bonus if it just attacked, otherwise
/// minus its weighted path length to the closest archer. An unreachable
/// archer (or none left) costs [`crate::pathfind::UNREACHABLE`], which
/// swamps every other term. Arithmetic saturates, so the sentinel never
/// wraps around.
pub fn evaluate(state: &CombatState, heuristics: &Heuristics) -> Score {
    let mut score: Score = 0;

    let needs_distance = state.melee().iter().any(|u| !u.attacking);
    let distances = if needs_distance { state.melee_distances() } else { &[][..] };

    for (i, unit) in state.melee().iter().enumerate() {
        if unit.attacking {
            score = score.saturating_add(heuristics.attack_bonus);
        } else {
            let penalty = heuristics.distance_weight.saturating_mul(Score::from(distances[i]));
            score = score.saturating_sub(penalty);
        }
        score = score.saturating_add(heuristics.melee_health_weight.saturating_mul(Score::from(unit.health)));
    }

    for unit in state.ranged() {
        if unit.attacking {
            score = score.saturating_sub(heuristics.ranged_attack_penalty);
        }
        score = score.saturating_sub(heuristics.ranged_health_weight.saturating_mul(Score::from(unit.health)));
    }

    score
}
