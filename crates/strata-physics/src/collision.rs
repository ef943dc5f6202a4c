//! Box-versus-grid overlap queries.
//!
//! A query box is tested against every cell its bounds touch. Cells whose
//! block has collision disabled are ignored; the rest contribute their
//! colliders, turned by the cell's rotation.

use glam::{IVec3, Vec3};
use strata_math::{Aabb, decode_rotation};
use strata_voxel::{CubeCollider, VoxelAccess};

/// Vertical probe used by ground and ceiling checks.
pub const GROUND_PROBE: f32 = 0.1;

/// World-space collision boxes of the block at `voxel`. Empty for air and
/// blocks without collision.
pub fn block_collision_boxes(world: &dyn VoxelAccess, voxel: IVec3) -> Vec<Aabb> {
    let cell = world.cell(voxel);
    if cell.is_air() {
        return Vec::new();
    }
    let Some(def) = world.blocks().get(cell.block) else {
        return Vec::new();
    };
    if !def.collision_enabled {
        return Vec::new();
    }
    let rotation = decode_rotation(cell.rotation);
    def.colliders
        .iter()
        .map(|collider| collider.rotated(rotation).block_bounds(voxel))
        .collect()
}

/// True if `bounds` shares volume with any solid collider in the world.
pub fn overlaps_world(world: &dyn VoxelAccess, bounds: &Aabb) -> bool {
    let (lo, hi) = bounds.cell_range();
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let voxel = IVec3::new(x, y, z);
                if block_collision_boxes(world, voxel)
                    .iter()
                    .any(|solid| solid.overlaps(bounds))
                {
                    return true;
                }
            }
        }
    }
    false
}

/// True if `point` lies inside (or on) any solid collider.
pub fn point_in_world(world: &dyn VoxelAccess, point: Vec3) -> bool {
    let voxel = point.floor().as_ivec3();
    block_collision_boxes(world, voxel)
        .iter()
        .any(|solid| solid.contains_point(point))
}

/// Would `collider`, anchored at `position` and moved by `displacement`,
/// overlap the world?
pub fn check_collisions(
    world: &dyn VoxelAccess,
    collider: &CubeCollider,
    position: Vec3,
    displacement: Vec3,
) -> bool {
    overlaps_world(world, &collider.bounds_at(position + displacement))
}

/// Standing on something: the box collides after a short probe downward.
pub fn is_grounded(world: &dyn VoxelAccess, collider: &CubeCollider, position: Vec3) -> bool {
    check_collisions(world, collider, position, Vec3::new(0.0, -GROUND_PROBE, 0.0))
}

/// Something directly overhead: the box collides after a short probe upward.
pub fn is_head_hitting(world: &dyn VoxelAccess, collider: &CubeCollider, position: Vec3) -> bool {
    check_collisions(world, collider, position, Vec3::new(0.0, GROUND_PROBE, 0.0))
}

/// True if at least one bottom corner of the box at `position` has ground
/// within `probe` below it.
pub fn has_ledge_support(
    world: &dyn VoxelAccess,
    collider: &CubeCollider,
    position: Vec3,
    probe: f32,
) -> bool {
    let bounds = collider.bounds_at(position);
    let y = bounds.min.y - probe;
    [
        Vec3::new(bounds.min.x, y, bounds.min.z),
        Vec3::new(bounds.max.x, y, bounds.min.z),
        Vec3::new(bounds.min.x, y, bounds.max.z),
        Vec3::new(bounds.max.x, y, bounds.max.z),
    ]
    .into_iter()
    .any(|corner| point_in_world(world, corner))
}
