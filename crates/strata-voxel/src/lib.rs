//! Block registry, dense chunk storage, and coordinate mapping for the voxel world.

pub mod access;
pub mod behavior;
pub mod blocks;
pub mod chunk;
pub mod coords;
pub mod material;
pub mod registry;

pub use access::{VoxelAccess, VoxelEdit};
pub use behavior::{
    BlockBehavior, ColorFn, DEFAULT_VERTEX_COLOR, MeshOverrideFn, OverrideGeometry, TickBehavior,
    TickFn,
};
pub use blocks::{builtin_atlas, builtin_blocks};
pub use chunk::{CHUNK_SIZE, CHUNK_VOLUME, ChunkData, VoxelCell};
pub use coords::{chunk_of, chunk_origin, local_of, wrap_coord, wrap_horizontal};
pub use material::{MaterialAtlas, UvRect};
pub use registry::{
    BlockRegistry, BlockTypeDef, BlockTypeId, CubeCollider, PlacementRotation, RegistryError,
    RenderBucket, block_anchor,
};
