//! Teams and units

use crate::grid::Cell;
use serde::{Deserialize, Serialize};

/// Unit identifier assigned by the host (unique within a state)
pub type UnitId = u32;

/// Fixed attack damage of a melee unit
pub const MELEE_DAMAGE: i32 = 10;
/// Fixed attack damage of a ranged unit
pub const RANGED_DAMAGE: i32 = 6;

/// Side of the skirmish
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    /// Footmen; the maximizing side
    Melee = 0,
    /// Archers; the minimizing side
    Ranged = 1,
}

impl Team {
    pub fn opponent(self) -> Self {
        match self {
            Team::Melee => Team::Ranged,
            Team::Ranged => Team::Melee,
        }
    }

    pub fn is_maximizing(self) -> bool {
        self == Team::Melee
    }

    pub fn base_damage(self) -> i32 {
        match self {
            Team::Melee => MELEE_DAMAGE,
            Team::Ranged => RANGED_DAMAGE,
        }
    }
}

/// A unit on the grid. Attack damage is fixed per team, see [`Team::base_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub team: Team,
    pub pos: Cell,
    pub health: i32,
    pub max_health: i32,
    /// Manhattan attack range (ranged units only; melee units strike adjacent cells)
    pub range: u32,
    /// Set on the child state when this unit attacked in the joint action that produced it
    pub attacking: bool,
}

impl Unit {
    pub fn new(id: UnitId, team: Team, pos: Cell, health: i32, range: u32) -> Self {
        Self {
            id,
            team,
            pos,
            health,
            max_health: health,
            range,
            attacking: false,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Check if `target` is within striking distance.
    ///
    /// Melee units need the target in the 8-neighborhood (Chebyshev distance
    /// exactly 1); ranged units reach along taxicab distance up to `range`.
    pub fn can_attack(&self, target: &Unit) -> bool {
        match self.team {
            Team::Melee => self.pos.chebyshev_to(target.pos) == 1,
            Team::Ranged => self.pos.manhattan_to(target.pos) <= self.range,
        }
    }
}
