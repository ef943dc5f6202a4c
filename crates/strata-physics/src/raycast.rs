//! Fixed-step raycast against block selection boxes.
//!
//! The ray is sampled every [`RAYCAST_STEP`] units. At each sample only the
//! block occupying that point is tested, so thin selection boxes are found
//! as long as they are thicker than one step.

use glam::{IVec3, Vec3};
use strata_math::{Aabb, decode_rotation};
use strata_voxel::{BlockTypeId, VoxelAccess};

/// Distance between ray samples.
pub const RAYCAST_STEP: f32 = 0.01;

/// Longest ray traced; larger reaches are clamped to this.
pub const MAX_RAYCAST_DISTANCE: f32 = 1024.0;

/// The first block a ray touched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockHit {
    pub voxel: IVec3,
    pub block: BlockTypeId,
    /// Ray sample that landed inside the selection box.
    pub point: Vec3,
    /// Unit axis of the face the ray entered through.
    pub normal: IVec3,
    pub distance: f32,
}

impl BlockHit {
    /// The empty cell in front of the hit face.
    pub fn adjacent(&self) -> IVec3 {
        self.voxel + self.normal
    }
}

/// Marches from `origin` along `direction` for up to `max_distance` and
/// returns the first selection box containing a sample. `max_distance` is
/// clamped to [`MAX_RAYCAST_DISTANCE`].
pub fn raycast_block(
    world: &dyn VoxelAccess,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<BlockHit> {
    let direction = direction.normalize_or_zero();
    if direction == Vec3::ZERO || !max_distance.is_finite() || max_distance < 0.0 {
        return None;
    }

    let max_distance = max_distance.min(MAX_RAYCAST_DISTANCE);
    let steps = (max_distance / RAYCAST_STEP).ceil() as u32;
    for i in 0..=steps {
        let distance = (i as f32 * RAYCAST_STEP).min(max_distance);
        let point = origin + direction * distance;
        let voxel = point.floor().as_ivec3();

        let cell = world.cell(voxel);
        if cell.is_air() {
            continue;
        }
        let Some(def) = world.blocks().get(cell.block) else {
            continue;
        };
        let rotation = decode_rotation(cell.rotation);
        let hit_box = def
            .selection
            .iter()
            .map(|selection| selection.rotated(rotation).block_bounds(voxel))
            .find(|bounds| bounds.contains_point(point));

        if let Some(bounds) = hit_box {
            return Some(BlockHit {
                voxel,
                block: cell.block,
                point,
                normal: entry_normal(&bounds, point),
                distance,
            });
        }
    }
    None
}

/// Face normal for a point inside `bounds`: the axis with the smallest
/// penetration, preferring X, then Y, then Z on ties.
fn entry_normal(bounds: &Aabb, point: Vec3) -> IVec3 {
    let penetration = bounds.penetration(point);
    let depth = penetration.abs();

    let axis = if depth.x <= depth.y && depth.x <= depth.z {
        0
    } else if depth.y <= depth.z {
        1
    } else {
        2
    };
    let mut normal = IVec3::ZERO;
    normal[axis] = if penetration[axis].is_sign_negative() { -1 } else { 1 };
    normal
}
