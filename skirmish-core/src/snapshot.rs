//! Host snapshot: the serialized input to a search

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::SkirmishError;
use crate::grid::{Battlefield, Cell};
use crate::state::CombatState;
use crate::unit::{Team, Unit, UnitId};

/// Unit as reported by the host
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: UnitId,
    pub x: i32,
    pub y: i32,
    pub health: i32,
    pub max_health: i32,
    #[serde(default = "default_range")]
    pub range: u32,
}

fn default_range() -> u32 {
    1
}

impl UnitRecord {
    fn to_unit(&self, team: Team) -> Unit {
        Unit {
            id: self.id,
            team,
            pos: Cell::new(self.x, self.y),
            health: self.health,
            max_health: self.max_health,
            range: self.range,
            attacking: false,
        }
    }
}

/// Battle snapshot handed over by the host once per turn
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: i32,
    pub height: i32,
    /// Side to choose a joint action for
    #[serde(default = "default_to_move")]
    pub to_move: Team,
    #[serde(default)]
    pub obstacles: Vec<Cell>,
    pub melee: Vec<UnitRecord>,
    pub ranged: Vec<UnitRecord>,
}

fn default_to_move() -> Team {
    Team::Melee
}

impl From<&Unit> for UnitRecord {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id,
            x: unit.pos.x,
            y: unit.pos.y,
            health: unit.health,
            max_health: unit.max_health,
            range: unit.range,
        }
    }
}

impl Snapshot {
    /// Capture a state, e.g. the end of a self-played skirmish
    pub fn from_state(state: &CombatState, to_move: Team) -> Self {
        let field = state.field();
        let mut obstacles: Vec<Cell> = field.obstacles().iter().copied().collect();
        obstacles.sort_by_key(|c| (c.y, c.x));
        Self {
            width: field.width(),
            height: field.height(),
            to_move,
            obstacles,
            melee: state.melee().iter().map(UnitRecord::from).collect(),
            ranged: state.ranged().iter().map(UnitRecord::from).collect(),
        }
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
    }

    /// Validate and convert to a search root.
    ///
    /// Units already at zero health are dropped.
    pub fn to_state(&self) -> Result<CombatState, SkirmishError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SkirmishError::InvalidMapSize {
                width: self.width,
                height: self.height,
            });
        }

        let field = Battlefield::new(self.width, self.height, self.obstacles.iter().copied());

        let mut seen_ids: FxHashSet<UnitId> = FxHashSet::default();
        let mut seen_cells: FxHashMap<Cell, UnitId> = FxHashMap::default();
        let mut convert = |records: &[UnitRecord], team: Team| -> Result<Vec<Unit>, SkirmishError> {
            let mut units = Vec::with_capacity(records.len());
            for record in records {
                let unit = record.to_unit(team);

                if !seen_ids.insert(unit.id) {
                    return Err(SkirmishError::DuplicateUnitId(unit.id));
                }
                if unit.health > unit.max_health {
                    return Err(SkirmishError::HealthAboveMax {
                        id: unit.id,
                        health: unit.health,
                        max_health: unit.max_health,
                    });
                }
                if unit.is_dead() {
                    tracing::debug!("Dropping dead {:?} unit {} from snapshot", team, unit.id);
                    continue;
                }
                if !field.contains(unit.pos) {
                    return Err(SkirmishError::UnitOutOfBounds { id: unit.id, pos: unit.pos });
                }
                if field.is_obstacle(unit.pos) {
                    return Err(SkirmishError::UnitOnObstacle { id: unit.id, pos: unit.pos });
                }
                if let Some(&first) = seen_cells.get(&unit.pos) {
                    return Err(SkirmishError::CellConflict {
                        first,
                        second: unit.id,
                        pos: unit.pos,
                    });
                }
                seen_cells.insert(unit.pos, unit.id);
                units.push(unit);
            }
            Ok(units)
        };

        let melee = convert(&self.melee, Team::Melee)?;
        let ranged = convert(&self.ranged, Team::Ranged)?;

        Ok(CombatState::new(Arc::new(field), melee, ranged))
    }
}
