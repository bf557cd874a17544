//! Self-play: alternate two policies until one side is wiped out

use serde::Serialize;

use crate::error::SkirmishError;
use crate::policy::Policy;
use crate::state::{CombatState, JointAction};
use crate::unit::Team;

/// Result of a skirmish
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    MeleeWins,
    RangedWins,
    /// Turn limit hit, or a side was left without a legal joint action
    Undecided,
}

impl Outcome {
    pub fn of(state: &CombatState) -> Self {
        if state.ranged().is_empty() {
            Outcome::MeleeWins
        } else if state.melee().is_empty() {
            Outcome::RangedWins
        } else {
            Outcome::Undecided
        }
    }

    pub fn winner(self) -> Option<Team> {
        match self {
            Outcome::MeleeWins => Some(Team::Melee),
            Outcome::RangedWins => Some(Team::Ranged),
            Outcome::Undecided => None,
        }
    }
}

/// One side's move in a skirmish
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub side: Team,
    pub action: JointAction,
}

/// Final state and move history of a skirmish
#[derive(Clone, Debug)]
pub struct SkirmishRecord {
    pub final_state: CombatState,
    pub turns: Vec<Turn>,
    pub outcome: Outcome,
}

/// Play from `initial`, `first` moving first, for at most `max_turns` plies
pub fn play_skirmish(
    initial: CombatState,
    first: Team,
    melee: &mut dyn Policy,
    ranged: &mut dyn Policy,
    max_turns: u32,
) -> Result<SkirmishRecord, SkirmishError> {
    let mut state = initial;
    let mut side = first;
    let mut turns = Vec::new();

    for _ in 0..max_turns {
        if state.is_over() {
            break;
        }

        let policy: &mut dyn Policy = match side {
            Team::Melee => &mut *melee,
            Team::Ranged => &mut *ranged,
        };
        let Some(action) = policy.choose(&state, side)? else {
            tracing::debug!("{:?} has no legal joint action; stopping", side);
            break;
        };

        tracing::trace!("Turn {}: {:?} ({}) plays {:?}", turns.len() + 1, side, policy.name(), action);
        state = state.apply(side, &action);
        turns.push(Turn { side, action });
        side = side.opponent();
    }

    let outcome = Outcome::of(&state);
    tracing::debug!("Skirmish finished after {} turns: {:?}", turns.len(), outcome);

    Ok(SkirmishRecord {
        final_state: state,
        turns,
        outcome,
    })
}
