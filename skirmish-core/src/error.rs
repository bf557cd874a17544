//! Engine error types

use crate::grid::Cell;
use crate::unit::{Team, UnitId};

/// Configuration and snapshot validation errors.
///
/// Raised at the entry points, before any search starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkirmishError {
    #[error("Search depth must be at least 1 ply (got {0})")]
    InvalidDepth(u32),

    #[error("No live {0:?} units to move")]
    NoUnitsToMove(Team),

    #[error("Invalid map size {width}x{height}")]
    InvalidMapSize { width: i32, height: i32 },

    #[error("Unit {id} at ({}, {}) is outside the map", .pos.x, .pos.y)]
    UnitOutOfBounds { id: UnitId, pos: Cell },

    #[error("Unit {id} at ({}, {}) stands on an obstacle", .pos.x, .pos.y)]
    UnitOnObstacle { id: UnitId, pos: Cell },

    #[error("Units {first} and {second} share cell ({}, {})", .pos.x, .pos.y)]
    CellConflict { first: UnitId, second: UnitId, pos: Cell },

    #[error("Duplicate unit id {0}")]
    DuplicateUnitId(UnitId),

    #[error("Unit {id} has health {health} above its max {max_health}")]
    HealthAboveMax { id: UnitId, health: i32, max_health: i32 },
}
