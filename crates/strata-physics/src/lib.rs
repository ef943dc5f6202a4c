//! Axis-aligned collision against the voxel grid: overlap queries, ground,
//! ceiling and ledge probes, movement resolution with step-up, and a
//! fixed-step block raycast.

mod collision;
mod movement;
mod raycast;

#[cfg(test)]
mod test_grid;

pub use collision::{
    GROUND_PROBE, block_collision_boxes, check_collisions, has_ledge_support, is_grounded,
    is_head_hitting, overlaps_world, point_in_world,
};
pub use movement::{MoveResult, MovementSettings, resolve_movement};
pub use raycast::{BlockHit, MAX_RAYCAST_DISTANCE, RAYCAST_STEP, raycast_block};
