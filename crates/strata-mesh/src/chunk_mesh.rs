//! Chunk mesh buffers: one shared vertex stream and an index list per
//! render bucket.

use glam::{Vec2, Vec3};
use strata_voxel::RenderBucket;

/// Number of drawable render buckets.
pub const BUCKET_COUNT: usize = 4;

/// Interleaved vertex ready for GPU upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in chunk-local coordinates.
    pub position: [f32; 3],
    pub normal: [f32; 3],
    /// Atlas UV.
    pub uv: [f32; 2],
    /// Linear RGBA.
    pub color: [f32; 4],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 48]);

/// Mesh output of one chunk rebuild.
///
/// Vertex attributes are parallel arrays. Each bucket is a triangle list
/// indexing into them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<[f32; 4]>,
    pub buckets: [Vec<u32>; BUCKET_COUNT],
}

impl ChunkMesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a vertex and returns its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3, uv: Vec2, color: [f32; 4]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        self.colors.push(color);
        index
    }

    /// Appends indices, offset by `base`, to the bucket's triangle list.
    pub fn push_indices(&mut self, bucket: RenderBucket, base: u32, indices: impl IntoIterator<Item = u32>) {
        self.buckets[bucket.slot()].extend(indices.into_iter().map(|i| base + i));
    }

    /// Triangle list for a bucket.
    pub fn bucket(&self, bucket: RenderBucket) -> &[u32] {
        &self.buckets[bucket.slot()]
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Releases all buffers.
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.uvs.clear();
        self.colors.clear();
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    /// Interleaves the attribute arrays into [`MeshVertex`] records.
    pub fn interleaved(&self) -> Vec<MeshVertex> {
        (0..self.vertex_count())
            .map(|i| MeshVertex {
                position: self.positions[i].to_array(),
                normal: self.normals[i].to_array(),
                uv: self.uvs[i].to_array(),
                color: self.colors[i],
            })
            .collect()
    }
}
