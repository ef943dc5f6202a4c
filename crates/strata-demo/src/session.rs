//! A scripted walker: falls under gravity, walks along +X, hops when blocked,
//! and periodically breaks the block it looks at and places glass there.

use glam::Vec3;
use strata_physics::{MovementSettings, is_grounded, resolve_movement};
use strata_voxel::{BlockTypeId, CubeCollider, VoxelAccess};
use strata_world::{PlaceOutcome, Ray, TickReport, VoxelWorld};
use tracing::{debug, info};

const TICK_SECONDS: f32 = 0.05;
const GRAVITY: f32 = -24.0;
const WALK_SPEED: f32 = 4.0;
const JUMP_SPEED: f32 = 8.0;
const EYE_HEIGHT: f32 = 1.62;
const INTERACT_EVERY: u64 = 40;

#[derive(Debug, Default)]
struct Counters {
    rebuilt: usize,
    block_updates: usize,
    steps_up: usize,
    jumps: usize,
    broken: usize,
    placed: usize,
    refused: usize,
}

pub struct Session {
    collider: CubeCollider,
    position: Vec3,
    velocity: Vec3,
    movement: MovementSettings,
    reach: f32,
    glass: BlockTypeId,
    counters: Counters,
}

impl Session {
    pub fn new(world: &VoxelWorld, movement: MovementSettings, reach: f32) -> Self {
        let half = world.settings().extent() as i32 / 2;
        let spawn = world.spawn_position(half, half);
        let position = spawn.as_vec3() + Vec3::new(0.5, 0.0, 0.5);
        info!(?spawn, "walker spawned");
        Self {
            collider: CubeCollider::new(0.6, 1.8, 0.6),
            position,
            velocity: Vec3::ZERO,
            movement,
            reach,
            glass: world
                .blocks()
                .lookup_by_name("glass")
                .unwrap_or(BlockTypeId::AIR),
            counters: Counters::default(),
        }
    }

    pub fn step(&mut self, world: &mut VoxelWorld, report: TickReport) {
        self.counters.rebuilt += report.rebuilt;
        self.counters.block_updates += report.block_updates;

        self.velocity.x = WALK_SPEED;
        self.velocity.y += GRAVITY * TICK_SECONDS;
        let result = resolve_movement(
            &*world,
            &self.collider,
            self.position,
            self.velocity,
            self.velocity * TICK_SECONDS,
            &self.movement,
        );
        self.position = result.position;
        self.velocity = result.velocity;
        if result.stepped {
            self.counters.steps_up += 1;
        }
        if result.blocked.x && is_grounded(&*world, &self.collider, self.position) {
            self.velocity.y = JUMP_SPEED;
            self.counters.jumps += 1;
        }

        if report.tick % INTERACT_EVERY == 0 {
            self.interact(world);
        }
    }

    fn interact(&mut self, world: &mut VoxelWorld) {
        let ray = Ray::new(
            self.position + Vec3::Y * EYE_HEIGHT,
            Vec3::new(1.0, -0.6, 0.0),
            self.reach,
        );
        if let Some((voxel, block)) = world.break_block(&ray) {
            self.counters.broken += 1;
            debug!(?voxel, block = block.0, "walker broke a block");
        }
        let body = self.collider.bounds_at(self.position);
        match world.place_block(&ray, self.glass, &body) {
            PlaceOutcome::Placed { position, .. } => {
                self.counters.placed += 1;
                debug!(?position, "walker placed glass");
            }
            outcome => {
                self.counters.refused += 1;
                debug!(?outcome, "placement refused");
            }
        }
    }

    pub fn log_summary(&self, world: &VoxelWorld) {
        let c = &self.counters;
        info!(
            ticks = world.tick_count(),
            rebuilt = c.rebuilt,
            pending = world.pending_rebuilds(),
            block_updates = c.block_updates,
            steps_up = c.steps_up,
            jumps = c.jumps,
            broken = c.broken,
            placed = c.placed,
            refused = c.refused,
            position = ?self.position,
            "session finished"
        );
    }
}
