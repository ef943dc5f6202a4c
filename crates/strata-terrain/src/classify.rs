//! Elevation classification: which block a terrain column holds at height `y`.
//!
//! Chunk population and the unloaded-voxel fallback both go through
//! [`classify`], so a voxel reads the same before and after its chunk loads.

use glam::IVec3;
use strata_voxel::{BlockRegistry, BlockTypeId};

use crate::error::TerrainError;
use crate::noise_field::NoiseField;

/// Surface height at noise height `0.0`.
pub const MIN_SURFACE: f32 = 40.0;
/// Surface height at noise height `1.0`.
pub const MAX_SURFACE: f32 = 120.0;
/// Water fills air cells above the surface up to and including this level.
pub const WATER_LEVEL: i32 = 64;
/// Depth of the dirt layer under the surface block.
pub const DIRT_DEPTH: i32 = 4;
/// Lowest generated voxel row.
pub const WORLD_MIN_Y: i32 = 0;
/// Highest generated voxel row.
pub const WORLD_MAX_Y: i32 = 255;

/// The block ids terrain generation writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TerrainPalette {
    pub air: BlockTypeId,
    pub stone: BlockTypeId,
    pub dirt: BlockTypeId,
    pub sand: BlockTypeId,
    pub grass_block: BlockTypeId,
    pub water: BlockTypeId,
}

impl TerrainPalette {
    /// Resolve the palette by block name.
    pub fn from_registry(registry: &BlockRegistry) -> Result<Self, TerrainError> {
        let find = |name: &str| {
            registry
                .lookup_by_name(name)
                .ok_or_else(|| TerrainError::MissingBlock(name.to_string()))
        };
        Ok(Self {
            air: BlockTypeId::AIR,
            stone: find("stone")?,
            dirt: find("dirt")?,
            sand: find("sand")?,
            grass_block: find("grass_block")?,
            water: find("water")?,
        })
    }
}

/// Surface row for a noise height: `round(lerp(40, 120, height))`, ties to even.
pub fn surface_height(height: f32) -> i32 {
    (MIN_SURFACE + (MAX_SURFACE - MIN_SURFACE) * height).round_ties_even() as i32
}

/// Block at row `y` of a column whose surface row is `surface`.
pub fn classify(y: i32, surface: i32, palette: &TerrainPalette) -> BlockTypeId {
    if y < surface - DIRT_DEPTH {
        palette.stone
    } else if y < surface {
        palette.dirt
    } else if y == surface {
        if surface < WATER_LEVEL {
            palette.sand
        } else {
            palette.grass_block
        }
    } else if y <= WATER_LEVEL {
        palette.water
    } else {
        palette.air
    }
}

/// Procedural block at a global position of a world `field.size()` columns wide.
///
/// Rows outside `[WORLD_MIN_Y, WORLD_MAX_Y]` are air. Columns outside the
/// generated extent are stone, so nothing past the world edge is undefined.
pub fn terrain_block(field: &NoiseField, pos: IVec3, palette: &TerrainPalette) -> BlockTypeId {
    if !(WORLD_MIN_Y..=WORLD_MAX_Y).contains(&pos.y) {
        return palette.air;
    }
    let extent = 0..field.size() as i32;
    if !extent.contains(&pos.x) || !extent.contains(&pos.z) {
        return palette.stone;
    }
    let surface = surface_height(field.get(pos.x, pos.z).height);
    classify(pos.y, surface, palette)
}
