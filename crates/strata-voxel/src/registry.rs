//! Block type registry: maps compact [`BlockTypeId`] values to [`BlockTypeDef`]
//! records and their [`BlockBehavior`] hooks.
//!
//! The registry is built once before the world exists and is read-only
//! afterwards. Air is always ID 0 so that zero-initialized chunk memory
//! represents empty space.

use std::collections::{BTreeMap, HashMap};
use std::f32::consts::{FRAC_PI_2, PI};

use glam::{IVec3, Quat, Vec3};
use serde::{Deserialize, Serialize};
use strata_math::{Aabb, CubeRotation, encode_rotation};
use thiserror::Error;

use crate::behavior::BlockBehavior;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Compact identifier stored inside every voxel cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockTypeId(pub u32);

impl BlockTypeId {
    /// The reserved empty type.
    pub const AIR: BlockTypeId = BlockTypeId(0);
}

/// Which index list a block's triangles land in, and how its faces cull.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderBucket {
    /// Fully hides whatever is behind it.
    Opaque,
    /// See-through solids (glass).
    Transparent,
    /// Alpha-tested foliage (leaves, plants).
    Vegetation,
    /// Fluid surfaces.
    Water,
    /// Never rendered.
    Air,
}

impl RenderBucket {
    /// The four drawable buckets, in index-list order.
    pub const DRAWABLE: [RenderBucket; 4] = [
        Self::Opaque,
        Self::Transparent,
        Self::Vegetation,
        Self::Water,
    ];

    /// Slot in a mesh's bucket array. Air shares the opaque slot, though
    /// nothing ever emits air geometry.
    pub fn slot(self) -> usize {
        match self {
            Self::Opaque | Self::Air => 0,
            Self::Transparent => 1,
            Self::Vegetation => 2,
            Self::Water => 3,
        }
    }
}

/// An axis-aligned box anchored at the bottom-center of its owner.
///
/// For a block the anchor is `voxel + (0.5, 0, 0.5)`; for an entity it is
/// the entity position (feet).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubeCollider {
    /// Extent along X.
    pub width: f32,
    /// Extent along Y.
    pub height: f32,
    /// Extent along Z.
    pub length: f32,
    /// Offset of the bottom-center from the anchor.
    pub offset: Vec3,
}

impl CubeCollider {
    /// A box of the given size sitting on its anchor.
    pub fn new(width: f32, height: f32, length: f32) -> Self {
        Self {
            width,
            height,
            length,
            offset: Vec3::ZERO,
        }
    }

    /// A full unit block.
    pub fn full_block() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Returns a copy moved by `offset`.
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Minimum corner relative to the anchor.
    pub fn local_min(&self) -> Vec3 {
        Vec3::new(-self.width * 0.5, 0.0, -self.length * 0.5) + self.offset
    }

    /// World-space bounds when anchored at `anchor`.
    pub fn bounds_at(&self, anchor: Vec3) -> Aabb {
        Aabb::from_min_size(
            anchor + self.local_min(),
            Vec3::new(self.width, self.height, self.length),
        )
    }

    /// World-space bounds when owned by the block in cell `voxel`.
    pub fn block_bounds(&self, voxel: IVec3) -> Aabb {
        self.bounds_at(block_anchor(voxel))
    }

    /// The collider of a block turned by `rotation` about its cell center.
    pub fn rotated(&self, rotation: CubeRotation) -> CubeCollider {
        if rotation == CubeRotation::IDENTITY {
            return *self;
        }
        let anchor = Vec3::new(0.5, 0.0, 0.5);
        let center = Vec3::splat(0.5);
        let min = anchor + self.local_min();
        let max = min + Vec3::new(self.width, self.height, self.length);
        let turned = Aabb::new(
            rotation.rotate_about(min, center),
            rotation.rotate_about(max, center),
        );
        let size = turned.size();
        let offset = turned.min - anchor + Vec3::new(size.x * 0.5, 0.0, size.z * 0.5);
        CubeCollider {
            width: size.x,
            height: size.y,
            length: size.z,
            offset,
        }
    }
}

/// Bottom-center of a voxel cell, where block colliders are anchored.
pub fn block_anchor(voxel: IVec3) -> Vec3 {
    voxel.as_vec3() + Vec3::new(0.5, 0.0, 0.5)
}

/// How a newly placed block picks its rotation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementRotation {
    /// Keep the model's default orientation.
    #[default]
    None,
    /// Turn the front (south face) toward the placing entity.
    Cardinal,
    /// Point the top at the clicked face normal (logs, pillars).
    Pillar,
    /// Cardinal, flipped upside down when placed against the upper half of a
    /// side face or against a bottom face (stairs, slabs).
    Full,
}

impl PlacementRotation {
    /// Resolves the rotation for a block placed against a face with normal
    /// `face_normal`, by an entity looking along `look`. `hit_height` is the
    /// hit point's height inside the clicked cell (`0.0..=1.0`).
    pub fn resolve(self, face_normal: IVec3, look: Vec3, hit_height: f32) -> CubeRotation {
        match self {
            Self::None => CubeRotation::IDENTITY,
            Self::Pillar => {
                if face_normal == IVec3::ZERO {
                    return CubeRotation::IDENTITY;
                }
                encode_rotation(Quat::from_rotation_arc(Vec3::Y, face_normal.as_vec3()))
            }
            Self::Cardinal => encode_rotation(cardinal_yaw(look)),
            Self::Full => {
                let upside_down = face_normal == IVec3::NEG_Y
                    || (face_normal.y == 0 && hit_height > 0.5);
                let yaw = cardinal_yaw(look);
                if upside_down {
                    encode_rotation(yaw * Quat::from_rotation_z(PI))
                } else {
                    encode_rotation(yaw)
                }
            }
        }
    }
}

/// Quarter-turn yaw that makes the local -Z face point back at the viewer.
fn cardinal_yaw(look: Vec3) -> Quat {
    let toward_viewer = -look;
    let turns = if toward_viewer.x.abs() > toward_viewer.z.abs() {
        if toward_viewer.x > 0.0 { 3 } else { 1 }
    } else if toward_viewer.z > 0.0 {
        2
    } else {
        0
    };
    Quat::from_rotation_y(turns as f32 * FRAC_PI_2)
}

/// Full descriptor for a block type.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockTypeDef {
    /// Unique name (e.g. "stone", "grass_block", "water").
    pub name: String,
    /// Render bucket and culling class.
    pub render_bucket: RenderBucket,
    /// Custom geometry id; `None` renders as a unit cube.
    pub geometry: Option<String>,
    /// Whether entities collide with this block.
    pub collision_enabled: bool,
    /// Collision boxes anchored at the cell's bottom-center.
    pub colliders: Vec<CubeCollider>,
    /// Boxes that raycasts can hit.
    pub selection: Vec<CubeCollider>,
    /// Rotation policy on placement.
    pub placement: PlacementRotation,
    /// Face tag → material id. The `"*"` entry is the fallback.
    pub materials: BTreeMap<String, String>,
}

impl BlockTypeDef {
    /// A solid unit cube using the material named after the block on every face.
    pub fn cube(name: &str, render_bucket: RenderBucket) -> Self {
        let mut materials = BTreeMap::new();
        materials.insert("*".to_string(), name.to_string());
        Self {
            name: name.to_string(),
            render_bucket,
            geometry: None,
            collision_enabled: true,
            colliders: vec![CubeCollider::full_block()],
            selection: vec![CubeCollider::full_block()],
            placement: PlacementRotation::None,
            materials,
        }
    }

    /// The empty type: invisible, no collision, not selectable.
    pub fn air() -> Self {
        Self {
            name: "air".to_string(),
            render_bucket: RenderBucket::Air,
            geometry: None,
            collision_enabled: false,
            colliders: Vec::new(),
            selection: Vec::new(),
            placement: PlacementRotation::None,
            materials: BTreeMap::new(),
        }
    }

    /// Uses baked geometry `id` instead of a unit cube.
    pub fn with_geometry(mut self, id: &str) -> Self {
        self.geometry = Some(id.to_string());
        self
    }

    /// Maps face tag `tag` to material `material`.
    pub fn with_material(mut self, tag: &str, material: &str) -> Self {
        self.materials.insert(tag.to_string(), material.to_string());
        self
    }

    /// Replaces the collision boxes.
    pub fn with_colliders(mut self, colliders: Vec<CubeCollider>) -> Self {
        self.colliders = colliders;
        self
    }

    /// Replaces the selection boxes.
    pub fn with_selection(mut self, selection: Vec<CubeCollider>) -> Self {
        self.selection = selection;
        self
    }

    /// Disables entity collision.
    pub fn without_collision(mut self) -> Self {
        self.collision_enabled = false;
        self.colliders.clear();
        self
    }

    /// Sets the placement rotation policy.
    pub fn with_placement(mut self, placement: PlacementRotation) -> Self {
        self.placement = placement;
        self
    }

    /// Material id for a face tag, falling back to `"*"`.
    pub fn material_for(&self, tag: &str) -> Option<&str> {
        self.materials
            .get(tag)
            .or_else(|| self.materials.get("*"))
            .map(String::as_str)
    }

    /// Returns `true` if the block is drawn in the opaque bucket.
    pub fn is_opaque(&self) -> bool {
        self.render_bucket == RenderBucket::Opaque
    }

    /// Returns `true` if this is the empty type.
    pub fn is_air(&self) -> bool {
        self.render_bucket == RenderBucket::Air
    }
}

/// Errors that can occur during block type registration.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A type with the same name has already been registered.
    #[error("duplicate block type name: {0}")]
    DuplicateName(String),
    /// Every id slot has been consumed.
    #[error("block type registry is full")]
    RegistryFull,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps [`BlockTypeId`] → [`BlockTypeDef`] with O(1) lookup by index and
/// O(1) reverse lookup by name.
#[derive(Clone)]
pub struct BlockRegistry {
    /// Dense array where `index == BlockTypeId.0`.
    types: Vec<BlockTypeDef>,
    /// Behavior hooks, parallel to `types`.
    behaviors: Vec<BlockBehavior>,
    /// Reverse lookup: name → ID.
    name_to_id: HashMap<String, BlockTypeId>,
}

impl BlockRegistry {
    /// Creates a new registry with air pre-registered as ID 0.
    pub fn new() -> Self {
        let mut name_to_id = HashMap::new();
        name_to_id.insert("air".to_string(), BlockTypeId::AIR);

        Self {
            types: vec![BlockTypeDef::air()],
            behaviors: vec![BlockBehavior::default()],
            name_to_id,
        }
    }

    /// Registers a block type with no behavior hooks.
    pub fn register(&mut self, def: BlockTypeDef) -> Result<BlockTypeId, RegistryError> {
        self.register_with_behavior(def, BlockBehavior::default())
    }

    /// Registers a block type and its behavior hooks, returning the new ID.
    ///
    /// IDs are assigned sequentially starting from 1 (0 is air).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if a type with the same name
    /// already exists, or [`RegistryError::RegistryFull`] if no ID is left.
    pub fn register_with_behavior(
        &mut self,
        def: BlockTypeDef,
        behavior: BlockBehavior,
    ) -> Result<BlockTypeId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        let id = u32::try_from(self.types.len()).map_err(|_| RegistryError::RegistryFull)?;

        let id = BlockTypeId(id);
        self.name_to_id.insert(def.name.clone(), id);
        self.types.push(def);
        self.behaviors.push(behavior);
        Ok(id)
    }

    /// Returns the definition for `id`, or `None` if it was never registered.
    pub fn get(&self, id: BlockTypeId) -> Option<&BlockTypeDef> {
        self.types.get(id.0 as usize)
    }

    /// Returns the behavior hooks for `id`. Unknown IDs have no hooks.
    pub fn behavior(&self, id: BlockTypeId) -> BlockBehavior {
        self.behaviors.get(id.0 as usize).copied().unwrap_or_default()
    }

    /// Returns the ID for a named block type, or `None` if not found.
    pub fn lookup_by_name(&self, name: &str) -> Option<BlockTypeId> {
        self.name_to_id.get(name).copied()
    }

    /// Returns `true` if `id` refers to a registered type.
    pub fn contains(&self, id: BlockTypeId) -> bool {
        (id.0 as usize) < self.types.len()
    }

    /// Returns the total number of registered types (including air).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if only air is registered.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= 1
    }

    /// Returns `true` if the given type is air (ID 0).
    pub fn is_air(&self, id: BlockTypeId) -> bool {
        id == BlockTypeId::AIR
    }

    /// Returns `true` if the given type renders in the opaque bucket.
    ///
    /// Unknown IDs are treated like air.
    pub fn is_opaque(&self, id: BlockTypeId) -> bool {
        self.get(id).is_some_and(BlockTypeDef::is_opaque)
    }

    /// Iterates `(id, definition)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockTypeId, &BlockTypeDef)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, def)| (BlockTypeId(i as u32), def))
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_is_id_zero() {
        let registry = BlockRegistry::new();
        let air = registry.get(BlockTypeId::AIR).unwrap();
        assert_eq!(air.name, "air");
        assert!(!air.collision_enabled);
        assert_eq!(air.render_bucket, RenderBucket::Air);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_returns_sequential_ids() {
        let mut registry = BlockRegistry::new();
        let stone = registry.register(BlockTypeDef::cube("stone", RenderBucket::Opaque)).unwrap();
        let glass = registry.register(BlockTypeDef::cube("glass", RenderBucket::Transparent)).unwrap();
        assert_eq!(stone, BlockTypeId(1));
        assert_eq!(glass, BlockTypeId(2));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_by_name() {
        let mut registry = BlockRegistry::new();
        let id = registry.register(BlockTypeDef::cube("obsidian", RenderBucket::Opaque)).unwrap();
        assert_eq!(registry.lookup_by_name("obsidian"), Some(id));
        assert_eq!(registry.lookup_by_name("nonexistent"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let mut registry = BlockRegistry::new();
        registry.register(BlockTypeDef::cube("stone", RenderBucket::Opaque)).unwrap();
        let result = registry.register(BlockTypeDef::cube("stone", RenderBucket::Opaque));
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
    }

    #[test]
    fn test_unknown_id_is_not_opaque() {
        let registry = BlockRegistry::new();
        assert!(registry.get(BlockTypeId(99)).is_none());
        assert!(!registry.is_opaque(BlockTypeId(99)));
        assert!(!registry.contains(BlockTypeId(99)));
    }

    #[test]
    fn test_material_fallback() {
        let def = BlockTypeDef::cube("grass_block", RenderBucket::Opaque)
            .with_material("top", "grass_top")
            .with_material("*", "grass_side");
        assert_eq!(def.material_for("top"), Some("grass_top"));
        assert_eq!(def.material_for("north"), Some("grass_side"));
        assert_eq!(BlockTypeDef::air().material_for("top"), None);
    }

    #[test]
    fn test_collider_bounds_anchor_bottom_center() {
        let bounds = CubeCollider::full_block().block_bounds(IVec3::new(2, 5, -1));
        assert_eq!(bounds.min, Vec3::new(2.0, 5.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 6.0, 0.0));

        let slab = CubeCollider::new(1.0, 0.5, 1.0).block_bounds(IVec3::ZERO);
        assert_eq!(slab.max.y, 0.5);
    }

    #[test]
    fn test_rotated_slab_stays_in_cell() {
        let slab = CubeCollider::new(1.0, 0.5, 1.0);
        let flipped = CubeRotation::from_up_and_yaw(IVec3::NEG_Y, 0).unwrap();
        let bounds = slab.rotated(flipped).block_bounds(IVec3::ZERO);
        assert!((bounds.min.y - 0.5).abs() < 1e-5, "upside-down slab hugs the ceiling: {bounds:?}");
        assert!((bounds.max.y - 1.0).abs() < 1e-5);
        assert!((bounds.min.x).abs() < 1e-5 && (bounds.max.z - 1.0).abs() < 1e-5);

        let wall = slab.rotated(CubeRotation::from_up_and_yaw(IVec3::X, 0).unwrap());
        let bounds = wall.block_bounds(IVec3::ZERO);
        assert!((bounds.size().x - 0.5).abs() < 1e-5, "slab on its side is half as wide: {bounds:?}");
        assert!((bounds.size().y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_pillar_points_top_at_normal() {
        for normal in [IVec3::X, IVec3::NEG_X, IVec3::Y, IVec3::NEG_Y, IVec3::Z, IVec3::NEG_Z] {
            let r = PlacementRotation::Pillar.resolve(normal, Vec3::NEG_Z, 0.5);
            assert_eq!(r.rotate_ivec(IVec3::Y), normal, "pillar against {normal:?}");
        }
    }

    #[test]
    fn test_cardinal_front_faces_viewer() {
        let cases = [
            (Vec3::new(0.0, -0.3, 1.0), IVec3::NEG_Z),
            (Vec3::new(0.0, -0.3, -1.0), IVec3::Z),
            (Vec3::new(1.0, -0.3, 0.2), IVec3::NEG_X),
            (Vec3::new(-1.0, -0.3, 0.2), IVec3::X),
        ];
        for (look, front) in cases {
            let r = PlacementRotation::Cardinal.resolve(IVec3::Y, look, 0.0);
            assert_eq!(r.rotate_ivec(IVec3::NEG_Z), front, "looking along {look:?}");
            assert_eq!(r.rotate_ivec(IVec3::Y), IVec3::Y);
        }
    }

    #[test]
    fn test_full_flips_on_upper_half() {
        let upper = PlacementRotation::Full.resolve(IVec3::X, Vec3::NEG_X, 0.75);
        assert_eq!(upper.rotate_ivec(IVec3::Y), IVec3::NEG_Y);
        let lower = PlacementRotation::Full.resolve(IVec3::X, Vec3::NEG_X, 0.25);
        assert_eq!(lower.rotate_ivec(IVec3::Y), IVec3::Y);
        let ceiling = PlacementRotation::Full.resolve(IVec3::NEG_Y, Vec3::Y, 0.0);
        assert_eq!(ceiling.rotate_ivec(IVec3::Y), IVec3::NEG_Y);
    }
}
