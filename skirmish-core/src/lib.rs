//! Skirmish Core - Tactical search engine for footmen vs archers
//!
//! This crate provides the combat decision engine:
//! - Grid battlefield with obstacles
//! - Units, teams and joint-action generation
//! - A* shortest paths for the distance feature
//! - Linear state evaluation
//! - Depth-limited alpha-beta search over joint actions
//! - Snapshot loading, policies and self-play

pub mod grid;
pub mod unit;
pub mod pathfind;
pub mod state;
pub mod node;
pub mod eval;
pub mod search;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod policy;
pub mod play;

// Re-exports for convenient access
pub use grid::{Battlefield, Cell, Direction};
pub use unit::{Team, Unit, UnitId, MELEE_DAMAGE, RANGED_DAMAGE};
pub use pathfind::{find_path, shortest_path_length, UNREACHABLE};
pub use state::{Action, CombatState, JointAction};
pub use node::SearchNode;
pub use eval::{evaluate, Heuristics, Score};
pub use search::{AlphaBetaAI, Scored, SearchStats};
pub use config::EngineConfig;
pub use error::SkirmishError;
pub use snapshot::{Snapshot, UnitRecord};
pub use policy::{Policy, RandomAI};
pub use play::{play_skirmish, Outcome, SkirmishRecord, Turn};
