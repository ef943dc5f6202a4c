//! Headless Strata demo.
//!
//! Loads `config.ron` (CLI flags override it), generates a world on a
//! background noise job, meshes it, then walks an entity across the terrain
//! for the configured number of ticks while breaking and placing blocks.
//! Run with `cargo run -p strata-demo -- --radius 2 --ticks 100`.

mod session;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use strata_config::{ChannelConfig, CliArgs, Config};
use strata_physics::MovementSettings;
use strata_terrain::{NoiseChannel, NoiseField, NoiseJob, NoiseSettings, TerrainError};
use strata_world::{VoxelWorld, WorldAssets, WorldError, WorldSettings};
use tracing::info;

use crate::session::Session;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error(transparent)]
    World(#[from] WorldError),
}

fn channel(config: &ChannelConfig) -> NoiseChannel {
    NoiseChannel {
        scale: config.scale,
        octaves: config.octaves,
        lacunarity: config.lacunarity,
        persistence: config.persistence,
    }
}

fn noise_settings(config: &Config) -> NoiseSettings {
    NoiseSettings {
        seed: config.world.seed,
        height: channel(&config.noise.height),
        temperature: channel(&config.noise.temperature),
        humidity: channel(&config.noise.humidity),
        blend_width: config.noise.blend_width as usize,
    }
}

fn world_settings(config: &Config) -> WorldSettings {
    WorldSettings {
        radius: config.world.radius,
        vertical_chunks: config.world.vertical_chunks,
        rebuild_budget: config.world.rebuild_budget as usize,
        seed: u64::from(config.world.seed),
    }
}

fn movement_settings(config: &Config) -> MovementSettings {
    MovementSettings {
        step_height: config.physics.step_height,
        prevent_ledge_fall: config.physics.prevent_ledge_fall,
        ledge_probe: config.physics.ledge_probe,
    }
}

/// Polls the noise job between short sleeps until the field is ready.
fn wait_for_field(mut job: NoiseJob) -> Result<NoiseField, TerrainError> {
    let mut polls = 0u32;
    loop {
        if let Some(result) = job.try_complete() {
            info!(polls, "noise field ready");
            return result;
        }
        polls += 1;
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn run(config: &Config) -> Result<(), DemoError> {
    let started = Instant::now();
    let assets = Arc::new(WorldAssets::builtin()?);
    info!(
        blocks = assets.blocks.len(),
        geometries = assets.geometries.len(),
        "registries loaded"
    );

    let settings = world_settings(config);
    let job = NoiseJob::spawn(
        settings.extent(),
        noise_settings(config),
        config.world.worker_threads as usize,
    )?;
    let field = wait_for_field(job)?;

    let mut world = VoxelWorld::new(assets, field, settings)?;
    let meshed = world.rebuild_all()?;
    let vertices: usize = world.chunks().map(|chunk| chunk.mesh().vertex_count()).sum();
    info!(
        chunks = meshed,
        vertices,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "world meshed"
    );

    let mut session = Session::new(&world, movement_settings(config), config.physics.reach);
    for _ in 0..config.debug.demo_ticks {
        let report = world.tick()?;
        session.step(&mut world, report);
    }
    session.log_summary(&world);
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("strata")
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&config) {
        tracing::error!("demo failed: {e}");
        std::process::exit(1);
    }
}
