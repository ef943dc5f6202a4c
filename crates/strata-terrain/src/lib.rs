//! Procedural terrain: fBm noise channels, the toroidal NoiseField and its
//! background job, and elevation classification into block types.

mod classify;
mod error;
mod fbm;
mod job;
mod noise_field;

pub use classify::{
    DIRT_DEPTH, MAX_SURFACE, MIN_SURFACE, TerrainPalette, WATER_LEVEL, WORLD_MAX_Y, WORLD_MIN_Y,
    classify, surface_height, terrain_block,
};
pub use error::TerrainError;
pub use fbm::{FbmSampler, NoiseChannel};
pub use job::NoiseJob;
pub use noise_field::{ColumnSampler, DEFAULT_BLEND_WIDTH, NoiseField, NoiseSample, NoiseSettings};
