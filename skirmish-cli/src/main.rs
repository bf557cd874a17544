//! Skirmish CLI - Command-line interface
//!
//! Commands:
//! - search: Choose a joint action for a snapshot
//! - play: Self-play a snapshot to the end

mod play_cmd;
mod search_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use skirmish_core::{EngineConfig, Heuristics, Team};

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(about = "Alpha-beta tactics for footmen vs archers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Choose the joint action for the side to move
    Search(search_cmd::SearchArgs),
    /// Play the snapshot out between two policies
    Play(play_cmd::PlayArgs),
}

/// Side selector for command-line flags
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SideArg {
    Melee,
    Ranged,
}

impl From<SideArg> for Team {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Melee => Team::Melee,
            SideArg::Ranged => Team::Ranged,
        }
    }
}

/// Engine flags shared by every subcommand
#[derive(Args)]
pub struct EngineArgs {
    /// Engine config JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Heuristic weights JSON file (overrides config)
    #[arg(long, value_name = "FILE")]
    pub heuristics: Option<PathBuf>,

    /// Search depth in plies (overrides config)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Disable alpha-beta cutoffs
    #[arg(long)]
    pub no_pruning: bool,
}

impl EngineArgs {
    /// Config file (or defaults) with command-line overrides applied
    pub fn resolve(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };
        if let Some(path) = &self.heuristics {
            config = config.with_heuristics(Heuristics::load(path)?);
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if self.no_pruning {
            config = config.without_pruning();
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => search_cmd::run(args),
        Commands::Play(args) => play_cmd::run(args),
    }
}
