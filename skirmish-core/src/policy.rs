//! Players that choose joint actions

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::error::SkirmishError;
use crate::search::AlphaBetaAI;
use crate::state::{CombatState, JointAction};
use crate::unit::Team;

/// Anything that picks a joint action for one side
pub trait Policy {
    fn name(&self) -> &str;

    /// `Ok(None)` when `side` has no legal joint action
    fn choose(&mut self, state: &CombatState, side: Team) -> Result<Option<JointAction>, SkirmishError>;
}

impl Policy for AlphaBetaAI {
    fn name(&self) -> &str {
        "alphabeta"
    }

    fn choose(&mut self, state: &CombatState, side: Team) -> Result<Option<JointAction>, SkirmishError> {
        self.best_action(state, side)
    }
}

/// Uniform choice among legal joint actions
pub struct RandomAI {
    rng: ChaCha8Rng,
}

impl RandomAI {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAI {
    fn default() -> Self {
        Self::new()
    }
}

impl Policy for RandomAI {
    fn name(&self) -> &str {
        "random"
    }

    fn choose(&mut self, state: &CombatState, side: Team) -> Result<Option<JointAction>, SkirmishError> {
        if state.team(side).is_empty() {
            return Err(SkirmishError::NoUnitsToMove(side));
        }
        let actions = state.legal_joint_actions(side);
        Ok(actions.choose(&mut self.rng).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Heuristics;
    use crate::grid::{Battlefield, Cell};
    use crate::unit::Unit;
    use std::sync::Arc;

    fn open_field() -> CombatState {
        let field = Arc::new(Battlefield::new(5, 5, [Cell::new(2, 2)]));
        CombatState::new(
            field,
            vec![Unit::new(1, Team::Melee, Cell::new(0, 0), 160, 1), Unit::new(2, Team::Melee, Cell::new(1, 0), 160, 1)],
            vec![Unit::new(3, Team::Ranged, Cell::new(4, 4), 50, 8)],
        )
    }

    #[test]
    fn test_random_picks_legal_action() {
        let state = open_field();
        let legal = state.legal_joint_actions(Team::Melee);
        let mut ai = RandomAI::with_seed(7);
        for _ in 0..20 {
            let chosen = ai.choose(&state, Team::Melee).unwrap().unwrap();
            assert!(legal.contains(&chosen));
        }
    }

    #[test]
    fn test_random_is_seeded() {
        let state = open_field();
        let mut a = RandomAI::with_seed(99);
        let mut b = RandomAI::with_seed(99);
        for _ in 0..10 {
            assert_eq!(a.choose(&state, Team::Ranged).unwrap(), b.choose(&state, Team::Ranged).unwrap());
        }
    }

    #[test]
    fn test_random_rejects_empty_side() {
        let field = Arc::new(Battlefield::new(3, 1, []));
        let state = CombatState::new(field, vec![Unit::new(1, Team::Melee, Cell::new(0, 0), 10, 1)], vec![]);
        let mut ai = RandomAI::new();
        assert_eq!(ai.choose(&state, Team::Ranged), Err(SkirmishError::NoUnitsToMove(Team::Ranged)));
    }

    #[test]
    fn test_alphabeta_policy_matches_best_action() {
        let state = open_field();
        let mut policy: Box<dyn Policy> = Box::new(AlphaBetaAI::new(2, Heuristics::default()));
        let mut direct = AlphaBetaAI::new(2, Heuristics::default());
        assert_eq!(policy.name(), "alphabeta");
        assert_eq!(
            policy.choose(&state, Team::Melee).unwrap(),
            direct.best_action(&state, Team::Melee).unwrap()
        );
    }
}
