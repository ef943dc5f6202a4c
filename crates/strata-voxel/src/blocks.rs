//! The built-in block set and its behavior hooks.

use glam::{IVec3, Vec3};
use rand::{Rng, RngCore};

use crate::access::{VoxelAccess, VoxelEdit};
use crate::behavior::BlockBehavior;
use crate::material::MaterialAtlas;
use crate::registry::{
    BlockRegistry, BlockTypeDef, BlockTypeId, CubeCollider, PlacementRotation, RegistryError,
    RenderBucket,
};

/// Ticks between grass spread attempts.
pub const GRASS_SPREAD_INTERVAL: u64 = 100;

/// Material ids referenced by [`builtin_blocks`], in atlas order.
pub const BUILTIN_MATERIALS: [&str; 18] = [
    "arrow_block",
    "chest",
    "chest_front",
    "dirt",
    "glass",
    "grass",
    "grass_block_side",
    "grass_block_top",
    "gravel",
    "oak_leaves",
    "oak_log",
    "oak_log_top",
    "sand",
    "stone",
    "stone_slab_side",
    "stone_slab_top",
    "water",
    "water_flow",
];

/// Registers the built-in block types in their canonical id order:
/// air, arrow_block, chest, dirt, glass, grass, grass_block, gravel,
/// oak_leaves, oak_log, sand, stone, stone_slab, stone_stair, water.
pub fn builtin_blocks() -> Result<BlockRegistry, RegistryError> {
    use RenderBucket::*;

    let mut registry = BlockRegistry::new();

    registry.register(
        BlockTypeDef::cube("arrow_block", Opaque)
            .with_geometry("arrow_block")
            .with_placement(PlacementRotation::Cardinal),
    )?;
    registry.register(
        BlockTypeDef::cube("chest", Opaque)
            .with_geometry("chest")
            .with_material("front", "chest_front")
            .with_colliders(vec![CubeCollider::new(0.875, 0.875, 0.875)])
            .with_selection(vec![CubeCollider::new(0.875, 0.875, 0.875)])
            .with_placement(PlacementRotation::Cardinal),
    )?;
    registry.register(BlockTypeDef::cube("dirt", Opaque))?;
    registry.register(BlockTypeDef::cube("glass", Transparent))?;
    registry.register_with_behavior(
        BlockTypeDef::cube("grass", Vegetation)
            .with_geometry("grass")
            .without_collision()
            .with_selection(vec![CubeCollider::new(0.8, 0.8, 0.8)]),
        BlockBehavior::default()
            .with_color(grass_color)
            .with_tick(GRASS_SPREAD_INTERVAL, grass_spread),
    )?;
    registry.register(
        BlockTypeDef::cube("grass_block", Opaque)
            .with_material("top", "grass_block_top")
            .with_material("bottom", "dirt")
            .with_material("*", "grass_block_side"),
    )?;
    registry.register(BlockTypeDef::cube("gravel", Opaque))?;
    registry.register(BlockTypeDef::cube("oak_leaves", Vegetation))?;
    registry.register(
        BlockTypeDef::cube("oak_log", Opaque)
            .with_material("top", "oak_log_top")
            .with_material("bottom", "oak_log_top")
            .with_placement(PlacementRotation::Pillar),
    )?;
    registry.register(BlockTypeDef::cube("sand", Opaque))?;
    registry.register(BlockTypeDef::cube("stone", Opaque))?;
    registry.register(
        BlockTypeDef::cube("stone_slab", Opaque)
            .with_geometry("stone_slab")
            .with_material("top", "stone_slab_top")
            .with_material("*", "stone_slab_side")
            .with_colliders(vec![CubeCollider::new(1.0, 0.5, 1.0)])
            .with_selection(vec![CubeCollider::new(1.0, 0.5, 1.0)])
            .with_placement(PlacementRotation::Full),
    )?;
    let stair_boxes = vec![
        CubeCollider::new(1.0, 0.5, 1.0),
        CubeCollider::new(1.0, 0.5, 0.5).with_offset(Vec3::new(0.0, 0.5, 0.25)),
    ];
    registry.register(
        BlockTypeDef::cube("stone_stair", Opaque)
            .with_geometry("stone_stair")
            .with_material("top", "stone_slab_top")
            .with_material("*", "stone_slab_side")
            .with_colliders(stair_boxes.clone())
            .with_selection(stair_boxes)
            .with_placement(PlacementRotation::Full),
    )?;
    registry.register_with_behavior(
        BlockTypeDef::cube("water", Water)
            .with_material("top", "water")
            .with_material("*", "water_flow")
            .without_collision()
            .with_selection(Vec::new()),
        BlockBehavior::default().with_color(water_color),
    )?;

    Ok(registry)
}

/// Atlas covering [`BUILTIN_MATERIALS`].
pub fn builtin_atlas() -> MaterialAtlas {
    MaterialAtlas::grid(BUILTIN_MATERIALS, 8)
}

/// Vertical gradient: black at the bottom of the cell, white at the top.
pub fn grass_color(vertex: Vec3, _global: IVec3, _world: &dyn VoxelAccess) -> [f32; 4] {
    let t = vertex.y.clamp(0.0, 1.0);
    [t, t, t, 1.0]
}

/// Darkens top-surface corners that touch an opaque block, so shorelines
/// read as shallow water.
pub fn water_color(vertex: Vec3, global: IVec3, world: &dyn VoxelAccess) -> [f32; 4] {
    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    if vertex.y < 1.0 {
        return WHITE;
    }
    let dx = if vertex.x.round() >= 1.0 { 1 } else { -1 };
    let dz = if vertex.z.round() >= 1.0 { 1 } else { -1 };
    let corner_neighbors = [IVec3::new(dx, 0, dz), IVec3::new(dx, 0, 0), IVec3::new(0, 0, dz)];

    if corner_neighbors
        .iter()
        .any(|offset| world.is_opaque(global + *offset))
    {
        BLACK
    } else {
        WHITE
    }
}

/// Grass spreads into a random neighboring air cell that sits on grass_block.
pub fn grass_spread(global: IVec3, world: &mut dyn VoxelEdit, rng: &mut dyn RngCore) {
    let offset = IVec3::new(
        rng.random_range(-1..=1),
        rng.random_range(-1..=1),
        rng.random_range(-1..=1),
    );
    if offset == IVec3::ZERO {
        return;
    }
    let (Some(grass), Some(grass_block)) = (
        world.blocks().lookup_by_name("grass"),
        world.blocks().lookup_by_name("grass_block"),
    ) else {
        return;
    };

    let target = global + offset;
    if world.block_id(target - IVec3::Y) == grass_block && world.block_id(target) == BlockTypeId::AIR {
        world.set_cell(target, grass, 0);
    }
}
