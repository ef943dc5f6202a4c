//! Movement resolution against the voxel grid.
//!
//! A desired displacement is tried whole first. On collision the resolver
//! falls back, in order, to: horizontal then vertical as two moves; stepping
//! up a ledge of at most `step_height` before moving horizontally; and
//! finally each axis on its own (X, Z, then Y). Axes that stay blocked have
//! their velocity zeroed.

use glam::{BVec3, Vec3};
use strata_voxel::{CubeCollider, VoxelAccess};

use crate::collision::{GROUND_PROBE, check_collisions, has_ledge_support, is_grounded};

/// Tuning for [`resolve_movement`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementSettings {
    /// Highest ledge the entity climbs without jumping.
    pub step_height: f32,
    /// Refuse horizontal moves that would leave every bottom corner
    /// unsupported (sneaking).
    pub prevent_ledge_fall: bool,
    /// How far below the feet a corner may be from ground and still count.
    pub ledge_probe: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            step_height: 1.0,
            prevent_ledge_fall: false,
            ledge_probe: GROUND_PROBE,
        }
    }
}

/// Outcome of one movement step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveResult {
    pub position: Vec3,
    /// Input velocity with blocked axes zeroed.
    pub velocity: Vec3,
    /// The entity climbed a ledge this step.
    pub stepped: bool,
    /// Axes on which the desired motion was refused.
    pub blocked: BVec3,
}

struct Mover<'a> {
    world: &'a dyn VoxelAccess,
    collider: &'a CubeCollider,
}

impl Mover<'_> {
    fn free(&self, position: Vec3, displacement: Vec3) -> bool {
        !check_collisions(self.world, self.collider, position, displacement)
    }
}

/// Moves `collider` from `position` by `displacement`, sliding and stepping
/// around solid blocks.
pub fn resolve_movement(
    world: &dyn VoxelAccess,
    collider: &CubeCollider,
    position: Vec3,
    velocity: Vec3,
    displacement: Vec3,
    settings: &MovementSettings,
) -> MoveResult {
    let mover = Mover { world, collider };
    let mut blocked = BVec3::FALSE;
    let mut desired = displacement;

    let grounded = is_grounded(world, collider, position);
    if settings.prevent_ledge_fall && grounded {
        if desired.x != 0.0
            && !has_ledge_support(world, collider, position + Vec3::X * desired.x, settings.ledge_probe)
        {
            desired.x = 0.0;
            blocked.x = true;
        }
        if desired.z != 0.0
            && !has_ledge_support(world, collider, position + Vec3::Z * desired.z, settings.ledge_probe)
        {
            desired.z = 0.0;
            blocked.z = true;
        }
    }

    let finish = |position: Vec3, blocked: BVec3, stepped: bool| MoveResult {
        position,
        velocity: Vec3::select(blocked, Vec3::ZERO, velocity),
        stepped,
        blocked,
    };

    if mover.free(position, desired) {
        return finish(position + desired, blocked, false);
    }

    let horizontal = Vec3::new(desired.x, 0.0, desired.z);
    let vertical = Vec3::new(0.0, desired.y, 0.0);
    let moves_horizontally = horizontal != Vec3::ZERO;

    if moves_horizontally {
        if mover.free(position, horizontal) {
            let mut next = position + horizontal;
            if mover.free(next, vertical) {
                next += vertical;
            } else {
                blocked.y = true;
            }
            return finish(next, blocked, false);
        }

        if settings.step_height > 0.0 && grounded && desired.y <= 0.0 {
            let lift = Vec3::new(0.0, settings.step_height, 0.0);
            if mover.free(position, lift) && mover.free(position + lift, horizontal) {
                tracing::trace!(?position, step = settings.step_height, "stepped up");
                return finish(position + lift + horizontal, blocked, true);
            }
        }
    }

    let mut next = position;
    for (axis, unit) in [(0, Vec3::X), (2, Vec3::Z), (1, Vec3::Y)] {
        let amount = desired[axis];
        if amount == 0.0 {
            continue;
        }
        let step = unit * amount;
        if mover.free(next, step) {
            next += step;
        } else {
            blocked.set(axis, true);
        }
    }
    finish(next, blocked, false)
}
