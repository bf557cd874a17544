//! Search command - pick one joint action for a snapshot
//!
//! Prints a JSON report on stdout; logs go to stderr.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use skirmish_core::{AlphaBetaAI, JointAction, SearchStats, Snapshot, Team};

use crate::{EngineArgs, SideArg};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct SearchArgs {
    /// Snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Side to move (overrides snapshot)
    #[arg(long, value_enum)]
    pub side: Option<SideArg>,
}

#[derive(Serialize)]
struct SearchReport {
    side: Team,
    depth: u32,
    pruning: bool,
    /// `None` when the side has no legal joint action
    action: Option<JointAction>,
    stats: StatsReport,
}

#[derive(Serialize)]
struct StatsReport {
    nodes: u64,
    leaves: u64,
    cutoffs: u64,
    elapsed_ms: f64,
}

impl StatsReport {
    fn new(stats: SearchStats, elapsed_ms: f64) -> Self {
        Self {
            nodes: stats.nodes,
            leaves: stats.leaves,
            cutoffs: stats.cutoffs,
            elapsed_ms,
        }
    }
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

pub fn run(args: SearchArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let snapshot = Snapshot::load(&args.snapshot)?;
    let side = args.side.map(Team::from).unwrap_or(snapshot.to_move);
    let state = snapshot.to_state()?;

    tracing::info!(
        "Searching for {:?}: {} footmen, {} archers, depth={}",
        side,
        state.melee().len(),
        state.ranged().len(),
        config.depth
    );

    let mut ai = AlphaBetaAI::from_config(&config);
    let start = Instant::now();
    let action = ai.best_action(&state, side)?;
    let stats = StatsReport::new(ai.stats(), start.elapsed().as_secs_f64() * 1000.0);

    tracing::info!(
        "Visited {} nodes ({} leaves, {} cutoffs) in {:.2}ms",
        stats.nodes,
        stats.leaves,
        stats.cutoffs,
        stats.elapsed_ms
    );

    let report = SearchReport {
        side,
        depth: ai.depth,
        pruning: ai.pruning,
        action,
        stats,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
