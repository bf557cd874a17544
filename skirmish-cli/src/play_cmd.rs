//! Play command - self-play a snapshot between two policies

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;

use skirmish_core::{
    play_skirmish, AlphaBetaAI, EngineConfig, Outcome, Policy, RandomAI, SkirmishRecord, Snapshot, Team, Turn,
};

use crate::{EngineArgs, SideArg};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

/// Who plays a side
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerArg {
    /// Alpha-beta engine
    Search,
    /// Uniformly random legal joint actions
    Random,
}

#[derive(Args)]
pub struct PlayArgs {
    /// Snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Player for the footmen
    #[arg(long, value_enum, default_value = "search")]
    pub melee: PlayerArg,

    /// Player for the archers
    #[arg(long, value_enum, default_value = "search")]
    pub ranged: PlayerArg,

    /// Side that moves first (overrides snapshot)
    #[arg(long, value_enum)]
    pub first: Option<SideArg>,

    /// Maximum plies before the skirmish is called undecided
    #[arg(long, default_value = "100")]
    pub max_turns: u32,

    /// Seed for random players
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PlayReport {
    outcome: Outcome,
    melee_player: String,
    ranged_player: String,
    turns: Vec<Turn>,
    final_state: Snapshot,
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve engine config and load the snapshot
/// 2. Play until elimination, stalemate or the turn limit
/// 3. Report the outcome
pub fn run(args: PlayArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let snapshot = Snapshot::load(&args.snapshot)?;
    let first = args.first.map(Team::from).unwrap_or(snapshot.to_move);
    let initial = snapshot.to_state()?;

    let mut melee = make_policy(args.melee, &config, args.seed);
    let mut ranged = make_policy(args.ranged, &config, args.seed.wrapping_add(1));

    tracing::info!(
        "Playing {} vs {} ({:?} first, depth={}, max_turns={})",
        melee.name(),
        ranged.name(),
        first,
        config.depth,
        args.max_turns
    );

    let record = play_skirmish(initial, first, &mut *melee, &mut *ranged, args.max_turns)?;
    let report = build_report(record, first, melee.name(), ranged.name());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_text_report(&report);
    }

    Ok(())
}

fn make_policy(player: PlayerArg, config: &EngineConfig, seed: u64) -> Box<dyn Policy> {
    match player {
        PlayerArg::Search => Box::new(AlphaBetaAI::from_config(config)),
        PlayerArg::Random => Box::new(RandomAI::with_seed(seed)),
    }
}

fn build_report(record: SkirmishRecord, first: Team, melee_player: &str, ranged_player: &str) -> PlayReport {
    // Side to move after the last recorded turn
    let next = if record.turns.len() % 2 == 0 { first } else { first.opponent() };
    PlayReport {
        outcome: record.outcome,
        melee_player: melee_player.to_string(),
        ranged_player: ranged_player.to_string(),
        final_state: Snapshot::from_state(&record.final_state, next),
        turns: record.turns,
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

fn print_text_report(report: &PlayReport) {
    for (i, turn) in report.turns.iter().enumerate() {
        let actions: Vec<String> = turn
            .action
            .iter()
            .map(|(id, action)| format!("{}={:?}", id, action))
            .collect();
        println!("{:>4}. {:?}: {}", i + 1, turn.side, actions.join(", "));
    }

    println!();
    println!("=== RESULT ===");
    println!("{} (melee) vs {} (ranged)", report.melee_player, report.ranged_player);
    println!("Outcome: {:?} after {} turns", report.outcome, report.turns.len());
    println!(
        "Survivors: {} footmen, {} archers",
        report.final_state.melee.len(),
        report.final_state.ranged.len()
    );
}
