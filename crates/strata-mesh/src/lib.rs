//! Geometry baking and chunk meshing: cube face tables, bone-hierarchy
//! geometry documents, the baked geometry registry, and the chunk mesher.

pub mod baker;
pub mod chunk_mesh;
pub mod face;
pub mod geometry;
pub mod mesher;
pub mod registry;

mod error;

pub use baker::{BakedGeometry, bake_geometry};
pub use chunk_mesh::{BUCKET_COUNT, ChunkMesh, MeshVertex};
pub use error::MeshError;
pub use face::{CUBE_CORNERS, CubeFace, FACE_UVS, QUAD_INDICES};
pub use geometry::{BoneDef, CuboidDef, FaceUv, GeometryDocument};
pub use mesher::{MeshContext, mesh_chunk};
pub use registry::{BUILTIN_GEOMETRY, GeometryRegistry};
