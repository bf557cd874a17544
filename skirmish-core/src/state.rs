//! Combat state and joint-action generation

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::eval::{evaluate, Heuristics, Score};
use crate::grid::{Battlefield, Cell, Direction};
use crate::node::SearchNode;
use crate::pathfind::{shortest_path_length, UNREACHABLE};
use crate::unit::{Team, Unit, UnitId};

// ============================================================================
// ACTIONS
// ============================================================================

/// Atomic action for a single unit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Step one cell in a cardinal direction
    Move { direction: Direction },
    /// Strike an enemy unit
    Attack { target: UnitId },
}

/// One action per live unit of the side to move, keyed by unit id
pub type JointAction = BTreeMap<UnitId, Action>;

// ============================================================================
// COMBAT STATE
// ============================================================================

/// Snapshot of both teams on a fixed battlefield (clone to mutate).
///
/// The side to move is not stored here; it is passed to every generation
/// call. Children are built with [`CombatState::apply`], never by mutating a
/// parent.
#[derive(Clone, Debug)]
pub struct CombatState {
    field: Arc<Battlefield>,
    melee: Vec<Unit>,
    ranged: Vec<Unit>,
    /// Per-footman path length to the nearest archer, filled on first use
    distances: OnceLock<Vec<u32>>,
}

impl CombatState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create state from unit lists. Dead units are dropped.
    pub fn new(field: Arc<Battlefield>, mut melee: Vec<Unit>, mut ranged: Vec<Unit>) -> Self {
        melee.retain(|u| !u.is_dead());
        ranged.retain(|u| !u.is_dead());
        Self {
            field,
            melee,
            ranged,
            distances: OnceLock::new(),
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn field(&self) -> &Battlefield {
        &self.field
    }

    pub fn melee(&self) -> &[Unit] {
        &self.melee
    }

    pub fn ranged(&self) -> &[Unit] {
        &self.ranged
    }

    /// Live units of a team
    pub fn team(&self, team: Team) -> &[Unit] {
        match team {
            Team::Melee => &self.melee,
            Team::Ranged => &self.ranged,
        }
    }

    /// Find a live unit by id on either team
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.melee.iter().chain(self.ranged.iter()).find(|u| u.id == id)
    }

    /// One team has been wiped out
    pub fn is_over(&self) -> bool {
        self.melee.is_empty() || self.ranged.is_empty()
    }

    /// Heuristic value of this state (higher favors melee)
    pub fn utility(&self, heuristics: &Heuristics) -> Score {
        evaluate(self, heuristics)
    }

    // ========================================================================
    // ACTION GENERATION
    // ========================================================================

    /// Legal atomic actions for one unit, each paired with the cell the unit
    /// ends the turn on. Moves come first in `Direction::ALL` order, then
    /// attacks in enemy team order.
    pub fn unit_actions(&self, unit: &Unit) -> Vec<(Action, Cell)> {
        let enemies = self.team(unit.team.opponent());
        let mut actions = Vec::with_capacity(Direction::ALL.len() + enemies.len());

        for direction in Direction::ALL {
            let dest = unit.pos.step(direction);
            if !self.field.is_open(dest) {
                continue;
            }
            if enemies.iter().any(|e| e.pos == dest) {
                continue;
            }
            actions.push((Action::Move { direction }, dest));
        }

        for enemy in enemies {
            if unit.can_attack(enemy) {
                actions.push((Action::Attack { target: enemy.id }, unit.pos));
            }
        }

        actions
    }

    /// Every legal joint action for `side`.
    ///
    /// Cross product of each unit's atomic actions, filtered so that no two
    /// units end on the same cell. Empty once either team is eliminated.
    pub fn legal_joint_actions(&self, side: Team) -> Vec<JointAction> {
        if self.is_over() {
            return vec![];
        }

        let units = self.team(side);
        let options: Vec<Vec<(Action, Cell)>> = units.iter().map(|u| self.unit_actions(u)).collect();

        // Full product first, one (action, end cell) per unit in team order
        let mut combos: Vec<Vec<(Action, Cell)>> = vec![Vec::with_capacity(units.len())];
        for unit_options in &options {
            combos = combos
                .iter()
                .flat_map(|prefix| {
                    unit_options.iter().map(move |&choice| {
                        let mut combo = prefix.clone();
                        combo.push(choice);
                        combo
                    })
                })
                .collect();
        }

        combos
            .into_iter()
            .filter(|combo| has_distinct_end_cells(combo))
            .map(|combo| {
                units
                    .iter()
                    .zip(combo)
                    .map(|(unit, (action, _))| (unit.id, action))
                    .collect()
            })
            .collect()
    }

    /// Expand into one child per legal joint action
    pub fn children(&self, side: Team) -> Vec<SearchNode> {
        self.legal_joint_actions(side)
            .into_iter()
            .map(|action| {
                let state = self.apply(side, &action);
                SearchNode::new(state, action)
            })
            .collect()
    }

    // ========================================================================
    // APPLY
    // ========================================================================

    /// Apply a joint action for `side`, return the resulting state.
    ///
    /// Attack flags are rebuilt from scratch: only the attackers of this joint
    /// action are marked. Units brought to zero health are removed and the
    /// distance cache starts empty.
    pub fn apply(&self, side: Team, joint: &JointAction) -> Self {
        let mut melee = self.melee.clone();
        let mut ranged = self.ranged.clone();
        for unit in melee.iter_mut().chain(ranged.iter_mut()) {
            unit.attacking = false;
        }

        let (movers, targets) = match side {
            Team::Melee => (&mut melee, &mut ranged),
            Team::Ranged => (&mut ranged, &mut melee),
        };

        for (&id, &action) in joint {
            let Some(actor) = movers.iter_mut().find(|u| u.id == id) else {
                tracing::warn!("Joint action names unit {} which is not a live {:?} unit", id, side);
                continue;
            };

            match action {
                Action::Move { direction } => {
                    actor.pos = actor.pos.step(direction);
                }
                Action::Attack { target } => {
                    let Some(victim) = targets.iter_mut().find(|u| u.id == target) else {
                        tracing::warn!("Unit {} attacks {} which is not a live enemy", id, target);
                        continue;
                    };
                    victim.health -= side.base_damage();
                    actor.attacking = true;
                }
            }
        }

        Self::new(Arc::clone(&self.field), melee, ranged)
    }

    // ========================================================================
    // DISTANCE FEATURE
    // ========================================================================

    /// Shortest path length from each footman (in team order) to its nearest
    /// archer. Obstacles and footmen block paths, archers do not. A footman
    /// with no reachable archer gets [`UNREACHABLE`]. Computed once per state.
    pub fn melee_distances(&self) -> &[u32] {
        self.distances.get_or_init(|| self.compute_melee_distances())
    }

    fn compute_melee_distances(&self) -> Vec<u32> {
        let mut blocked: FxHashSet<Cell> = self.field.obstacles().clone();
        blocked.extend(self.melee.iter().map(|u| u.pos));

        let nearest = |footman: &Unit| -> u32 {
            self.ranged
                .iter()
                .map(|archer| {
                    shortest_path_length(
                        footman.pos,
                        archer.pos,
                        &blocked,
                        self.field.width(),
                        self.field.height(),
                    )
                })
                .min()
                .unwrap_or(UNREACHABLE)
        };

        #[cfg(feature = "parallel")]
        let distances: Vec<u32> = {
            use rayon::prelude::*;
            self.melee.par_iter().map(nearest).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let distances: Vec<u32> = self.melee.iter().map(nearest).collect();

        distances
    }
}

/// Check no two entries share an end cell
fn has_distinct_end_cells(combo: &[(Action, Cell)]) -> bool {
    combo
        .iter()
        .enumerate()
        .all(|(i, (_, cell))| combo[i + 1..].iter().all(|(_, other)| other != cell))
}

// ============================================================================
// TESTS
// ============================================================================
