//! Per-block behavior hooks, stored as a function-pointer table next to the
//! block definitions.
//!
//! A block type either supplies a hook or leaves the slot empty; the
//! `has_*` methods expose the capability set to callers.

use glam::{IVec3, Vec2, Vec3};
use rand::RngCore;

use crate::access::{VoxelAccess, VoxelEdit};

/// Vertex color used when a block has no color hook.
pub const DEFAULT_VERTEX_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Computes a per-vertex color.
///
/// Receives the vertex position inside the block's unit cell (after the
/// cell's rotation), the block's global position, and the world.
pub type ColorFn = fn(vertex: Vec3, global: IVec3, world: &dyn VoxelAccess) -> [f32; 4];

/// Produces instance-specific geometry that replaces the block's normal mesh.
pub type MeshOverrideFn = fn(global: IVec3, world: &dyn VoxelAccess) -> Option<OverrideGeometry>;

/// Runs one scheduled update for the block at `global`.
pub type TickFn = fn(global: IVec3, world: &mut dyn VoxelEdit, rng: &mut dyn RngCore);

/// Geometry returned by a [`MeshOverrideFn`], in the block's unit cell.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// A repeating update hook.
#[derive(Clone, Copy, Debug)]
pub struct TickBehavior {
    /// Run every `interval` world ticks. Zero disables the hook.
    pub interval: u64,
    /// The update itself.
    pub on_tick: TickFn,
}

/// All optional hooks for one block type.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlockBehavior {
    pub color: Option<ColorFn>,
    pub mesh_override: Option<MeshOverrideFn>,
    pub tick: Option<TickBehavior>,
}

impl BlockBehavior {
    /// Sets the color hook.
    pub fn with_color(mut self, color: ColorFn) -> Self {
        self.color = Some(color);
        self
    }

    /// Sets the mesh override hook.
    pub fn with_mesh_override(mut self, hook: MeshOverrideFn) -> Self {
        self.mesh_override = Some(hook);
        self
    }

    /// Sets the tick hook.
    pub fn with_tick(mut self, interval: u64, on_tick: TickFn) -> Self {
        self.tick = Some(TickBehavior { interval, on_tick });
        self
    }

    pub fn has_custom_color(&self) -> bool {
        self.color.is_some()
    }

    pub fn has_mesh_override(&self) -> bool {
        self.mesh_override.is_some()
    }

    pub fn has_tick_behavior(&self) -> bool {
        self.tick.is_some_and(|t| t.interval > 0)
    }

    /// Runs the color hook, or returns [`DEFAULT_VERTEX_COLOR`].
    pub fn vertex_color(&self, vertex: Vec3, global: IVec3, world: &dyn VoxelAccess) -> [f32; 4] {
        match self.color {
            Some(color) => color(vertex, global, world),
            None => DEFAULT_VERTEX_COLOR,
        }
    }

    /// Runs the mesh override hook, if any.
    pub fn override_geometry(&self, global: IVec3, world: &dyn VoxelAccess) -> Option<OverrideGeometry> {
        self.mesh_override.and_then(|hook| hook(global, world))
    }
}
