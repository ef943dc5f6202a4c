//! A loaded chunk: voxel storage plus the mesh derived from it.

use glam::IVec3;
use strata_mesh::ChunkMesh;
use strata_voxel::{ChunkData, chunk_origin};

#[derive(Clone, Debug)]
pub struct Chunk {
    coord: IVec3,
    origin: IVec3,
    pub(crate) data: ChunkData,
    pub(crate) mesh: ChunkMesh,
    pub(crate) dirty: bool,
}

impl Chunk {
    /// A freshly generated chunk. It has no mesh yet and starts dirty.
    pub fn new(coord: IVec3, data: ChunkData) -> Self {
        Self {
            coord,
            origin: chunk_origin(coord),
            data,
            mesh: ChunkMesh::new(),
            dirty: true,
        }
    }

    /// Chunk-space coordinate.
    pub fn coord(&self) -> IVec3 {
        self.coord
    }

    /// Global position of the `(0, 0, 0)` cell.
    pub fn origin(&self) -> IVec3 {
        self.origin
    }

    pub fn data(&self) -> &ChunkData {
        &self.data
    }

    /// The last successfully built mesh.
    pub fn mesh(&self) -> &ChunkMesh {
        &self.mesh
    }

    /// Mesh is stale relative to the voxel data.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
