//! Search tree node

use crate::state::{CombatState, JointAction};

/// A state paired with the joint action that produced it from its parent.
///
/// The root carries an empty action.
#[derive(Clone, Debug)]
pub struct SearchNode {
    pub state: CombatState,
    pub action: JointAction,
}

impl SearchNode {
    pub fn new(state: CombatState, action: JointAction) -> Self {
        Self { state, action }
    }

    /// Wrap a host snapshot as the search root
    pub fn root(state: CombatState) -> Self {
        Self {
            state,
            action: JointAction::new(),
        }
    }
}
