//! The voxel world: chunk registry over a toroidal terrain field, voxel
//! reads and writes, deferred chunk remeshing, block ticks, and block
//! placement and removal.

mod chunk;
mod dirty;
mod error;
mod interaction;
mod world;

pub use chunk::Chunk;
pub use dirty::DirtyQueue;
pub use error::WorldError;
pub use interaction::{PlaceOutcome, Ray};
pub use world::{
    DEFAULT_RADIUS, DEFAULT_REBUILD_BUDGET, DEFAULT_VERTICAL_CHUNKS, TickReport, VoxelWorld,
    WorldAssets, WorldSettings,
};
