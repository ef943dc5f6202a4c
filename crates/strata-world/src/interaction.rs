//! Placing and breaking blocks along a line of sight.

use glam::{IVec3, Vec3};
use strata_math::Aabb;
use strata_physics::{BlockHit, raycast_block};
use strata_voxel::{BlockTypeId, chunk_of};

use crate::world::VoxelWorld;

/// A targeting ray: eye position, look direction, and reach.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub reach: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, reach: f32) -> Self {
        Self {
            origin,
            direction,
            reach,
        }
    }
}

/// Result of [`VoxelWorld::place_block`]. Only `Placed` changes the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    Placed { position: IVec3, rotation: u8 },
    /// The target cell is occupied, or the new block would overlap the
    /// entity placing it.
    Obstructed,
    /// The target cell lies outside the loaded world.
    OutOfReach,
    /// The ray hit nothing within reach.
    NothingTargeted,
    /// The block type is not registered.
    UnknownBlock,
}

impl VoxelWorld {
    /// First selectable block along `ray`.
    pub fn raycast(&self, ray: &Ray) -> Option<BlockHit> {
        raycast_block(self, ray.origin, ray.direction, ray.reach)
    }

    /// Places `block` against the face the ray hits. `body` is the world
    /// bounds of the entity placing it, which the new block may not overlap.
    pub fn place_block(&mut self, ray: &Ray, block: BlockTypeId, body: &Aabb) -> PlaceOutcome {
        let Some(hit) = self.raycast(ray) else {
            return PlaceOutcome::NothingTargeted;
        };
        let assets = self.assets().clone();
        let Some(def) = assets.blocks.get(block) else {
            tracing::warn!(block = block.0, "placement of unregistered block type");
            return PlaceOutcome::UnknownBlock;
        };

        let target = hit.adjacent();
        if self.chunk(chunk_of(target)).is_none() {
            return PlaceOutcome::OutOfReach;
        }
        let replaceable = self
            .get_block_type(target)
            .is_none_or(|current| current.selection.is_empty());
        if !replaceable {
            return PlaceOutcome::Obstructed;
        }

        let hit_height = hit.point.y - hit.voxel.y as f32;
        let rotation = def.placement.resolve(hit.normal, ray.direction, hit_height);
        if def.collision_enabled
            && def
                .colliders
                .iter()
                .any(|collider| collider.rotated(rotation).block_bounds(target).overlaps(body))
        {
            return PlaceOutcome::Obstructed;
        }

        if !self.set_block_type(target, block, rotation.index()) {
            return PlaceOutcome::OutOfReach;
        }
        tracing::debug!(block = %def.name, ?target, rotation = rotation.index(), "block placed");
        PlaceOutcome::Placed {
            position: target,
            rotation: rotation.index(),
        }
    }

    /// Replaces the targeted block with air. Returns its position and former
    /// type, or `None` if nothing loaded was hit.
    pub fn break_block(&mut self, ray: &Ray) -> Option<(IVec3, BlockTypeId)> {
        let hit = self.raycast(ray)?;
        if !self.set_block_type(hit.voxel, BlockTypeId::AIR, 0) {
            return None;
        }
        tracing::debug!(voxel = ?hit.voxel, block = hit.block.0, "block broken");
        Some((hit.voxel, hit.block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{WorldAssets, WorldSettings};
    use std::sync::Arc;
    use strata_math::decode_rotation;
    use strata_terrain::{NoiseField, NoiseSettings};
    use strata_voxel::{CubeCollider, VoxelAccess};

    const PILLAR: IVec3 = IVec3::new(8, 200, 8);

    fn sky_world() -> VoxelWorld {
        let assets = Arc::new(WorldAssets::builtin().unwrap());
        let settings = WorldSettings {
            radius: 1,
            ..Default::default()
        };
        let field = NoiseField::generate(16, &NoiseSettings::default()).unwrap();
        let mut world = VoxelWorld::new(assets, field, settings).unwrap();
        let stone = world.blocks().lookup_by_name("stone").unwrap();
        world.set_block_type(PILLAR, stone, 0);
        world
    }

    fn id(world: &VoxelWorld, name: &str) -> BlockTypeId {
        world.blocks().lookup_by_name(name).unwrap()
    }

    fn far_body() -> Aabb {
        CubeCollider::new(0.6, 1.8, 0.6).bounds_at(Vec3::new(2.5, 200.0, 2.5))
    }

    fn look_down() -> Ray {
        Ray::new(Vec3::new(8.5, 203.0, 8.5), Vec3::NEG_Y, 5.0)
    }

    #[test]
    fn test_place_on_top_face() {
        let mut world = sky_world();
        let stone = id(&world, "stone");
        let outcome = world.place_block(&look_down(), stone, &far_body());
        assert_eq!(
            outcome,
            PlaceOutcome::Placed {
                position: IVec3::new(8, 201, 8),
                rotation: 0
            }
        );
        assert_eq!(world.get_voxel(IVec3::new(8, 201, 8)), stone);
        assert!(world.is_pending(IVec3::new(0, 12, 0)));
    }

    #[test]
    fn test_place_into_entity_is_refused() {
        let mut world = sky_world();
        let stone = id(&world, "stone");
        let body = CubeCollider::new(0.6, 1.8, 0.6).bounds_at(Vec3::new(8.5, 201.0, 8.5));
        assert_eq!(world.place_block(&look_down(), stone, &body), PlaceOutcome::Obstructed);
        assert_eq!(world.get_voxel(IVec3::new(8, 201, 8)), BlockTypeId::AIR);
    }

    #[test]
    fn test_non_colliding_block_may_overlap_entity() {
        let mut world = sky_world();
        let grass = id(&world, "grass");
        let body = CubeCollider::new(0.6, 1.8, 0.6).bounds_at(Vec3::new(8.5, 201.0, 8.5));
        assert!(matches!(
            world.place_block(&look_down(), grass, &body),
            PlaceOutcome::Placed { .. }
        ));
    }

    #[test]
    fn test_nothing_targeted() {
        let mut world = sky_world();
        let stone = id(&world, "stone");
        let ray = Ray::new(Vec3::new(8.5, 203.0, 8.5), Vec3::Y, 5.0);
        assert_eq!(world.place_block(&ray, stone, &far_body()), PlaceOutcome::NothingTargeted);
    }

    #[test]
    fn test_target_outside_loaded_world() {
        let mut world = sky_world();
        let stone = id(&world, "stone");
        // Past the world edge every column reads as stone.
        let ray = Ray::new(Vec3::new(17.5, 100.5, 3.5), Vec3::X, 5.0);
        assert_eq!(world.place_block(&ray, stone, &far_body()), PlaceOutcome::OutOfReach);
        assert_eq!(world.break_block(&ray), None);
    }

    #[test]
    fn test_unknown_block() {
        let mut world = sky_world();
        assert_eq!(
            world.place_block(&look_down(), BlockTypeId(4242), &far_body()),
            PlaceOutcome::UnknownBlock
        );
    }

    #[test]
    fn test_stair_on_upper_side_is_upside_down() {
        let mut world = sky_world();
        let stair = id(&world, "stone_stair");
        let ray = Ray::new(Vec3::new(5.5, 200.75, 8.5), Vec3::X, 5.0);
        let PlaceOutcome::Placed { position, rotation } = world.place_block(&ray, stair, &far_body())
        else {
            panic!("stair was not placed");
        };
        assert_eq!(position, IVec3::new(7, 200, 8));
        assert_eq!(decode_rotation(rotation).rotate_ivec(IVec3::Y), IVec3::NEG_Y);
        assert_eq!(world.get_cell(position).rotation, rotation);
    }

    #[test]
    fn test_break_returns_removed_block() {
        let mut world = sky_world();
        world.rebuild_all().unwrap();
        let stone = id(&world, "stone");
        assert_eq!(world.break_block(&look_down()), Some((PILLAR, stone)));
        assert_eq!(world.get_voxel(PILLAR), BlockTypeId::AIR);
        assert!(world.is_pending(IVec3::new(0, 12, 0)));
        assert_eq!(world.break_block(&look_down()), None, "nothing left to break");
    }
}
