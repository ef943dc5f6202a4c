//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Headless Strata voxel world")]
pub struct CliArgs {
    /// Terrain seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// World size in chunks along X and Z.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Chunks remeshed per tick.
    #[arg(long)]
    pub budget: Option<u32>,

    /// Ticks to simulate before exiting.
    #[arg(long)]
    pub ticks: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(radius) = args.radius {
            self.world.radius = radius;
        }
        if let Some(budget) = args.budget {
            self.world.rebuild_budget = budget;
        }
        if let Some(ticks) = args.ticks {
            self.debug.demo_ticks = ticks;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
