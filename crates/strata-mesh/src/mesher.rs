//! Chunk meshing: turns one chunk's cells into a [`ChunkMesh`].
//!
//! Cells are scanned in storage order. Each non-air cell emits, in priority
//! order, its block's override geometry, a face-culled unit cube, or the
//! baked geometry named by its block type. Every batch lands in the index
//! list of the block's render bucket.

use glam::{IVec3, Vec3};
use strata_math::{CubeRotation, decode_rotation};
use strata_voxel::{
    BlockBehavior, BlockRegistry, BlockTypeDef, BlockTypeId, ChunkData, MaterialAtlas,
    OverrideGeometry, VoxelAccess, VoxelCell,
};

use crate::baker::BakedGeometry;
use crate::chunk_mesh::ChunkMesh;
use crate::error::MeshError;
use crate::face::{CubeFace, FACE_UVS, QUAD_INDICES};
use crate::registry::GeometryRegistry;

/// Center of the unit cell; custom geometry rotates about it.
const CELL_CENTER: Vec3 = Vec3::splat(0.5);

/// Read-only tables the mesher consults.
#[derive(Clone, Copy)]
pub struct MeshContext<'a> {
    pub blocks: &'a BlockRegistry,
    pub geometries: &'a GeometryRegistry,
    pub atlas: &'a MaterialAtlas,
}

/// Per-cell inputs shared by the three emit paths.
struct CellInstance<'a> {
    local: IVec3,
    global: IVec3,
    id: BlockTypeId,
    def: &'a BlockTypeDef,
    behavior: BlockBehavior,
    rotation: CubeRotation,
}

struct ChunkMesher<'a> {
    ctx: MeshContext<'a>,
    data: &'a ChunkData,
    origin: IVec3,
    world: &'a dyn VoxelAccess,
    mesh: ChunkMesh,
}

/// Builds the mesh for `data`, a chunk whose `(0, 0, 0)` cell sits at global
/// `origin`. Neighbors outside the chunk are read through `world`.
///
/// Fails on a cell whose type is not registered or whose geometry id was
/// never baked. The caller keeps its previous mesh in that case.
pub fn mesh_chunk(
    ctx: MeshContext<'_>,
    data: &ChunkData,
    origin: IVec3,
    world: &dyn VoxelAccess,
) -> Result<ChunkMesh, MeshError> {
    let mut mesher = ChunkMesher {
        ctx,
        data,
        origin,
        world,
        mesh: ChunkMesh::new(),
    };
    for (local, cell) in data.iter() {
        if cell.is_air() {
            continue;
        }
        mesher.emit_cell(local, cell)?;
    }
    Ok(mesher.mesh)
}

impl<'a> ChunkMesher<'a> {
    fn emit_cell(&mut self, local: IVec3, cell: VoxelCell) -> Result<(), MeshError> {
        let ctx = self.ctx;
        let global = self.origin + local;
        let def = ctx.blocks.get(cell.block).ok_or(MeshError::UnknownBlock {
            block: cell.block.0,
            position: global,
        })?;
        if def.is_air() {
            return Ok(());
        }
        let instance = CellInstance {
            local,
            global,
            id: cell.block,
            def,
            behavior: ctx.blocks.behavior(cell.block),
            rotation: decode_rotation(cell.rotation),
        };

        if let Some(geometry) = instance.behavior.override_geometry(global, self.world) {
            self.emit_override(&instance, &geometry);
            return Ok(());
        }

        match &def.geometry {
            None => self.emit_cube(&instance),
            Some(id) => {
                let baked = ctx.geometries.get(id).ok_or_else(|| MeshError::UnknownGeometry {
                    block: def.name.clone(),
                    geometry: id.clone(),
                })?;
                self.emit_baked(&instance, baked);
            }
        }
        Ok(())
    }

    /// Cell at a chunk-local position, reading across the chunk border
    /// through the world.
    fn neighbor(&self, local: IVec3) -> VoxelCell {
        match self.data.get(local) {
            Some(cell) => cell,
            None => self.world.cell(self.origin + local),
        }
    }

    /// A face is hidden behind an opaque neighbor, or behind the same
    /// non-opaque block (adjoining water or glass merges).
    fn face_hidden(&self, cell: &CellInstance<'_>, neighbor: VoxelCell) -> bool {
        self.ctx.blocks.is_opaque(neighbor.block) || (!cell.def.is_opaque() && neighbor.block == cell.id)
    }

    fn emit_cube(&mut self, cell: &CellInstance<'_>) {
        for face in CubeFace::ALL {
            let direction = cell.rotation.rotate_ivec(face.normal());
            if self.face_hidden(cell, self.neighbor(cell.local + direction)) {
                continue;
            }

            let normal = direction.as_vec3();
            let rect = self.ctx.atlas.rect_for(cell.def, face.key());
            let base = self.mesh.vertex_count() as u32;
            for (corner, uv) in face.corners().into_iter().zip(FACE_UVS) {
                let vertex = cell.rotation.rotate_about(corner, CELL_CENTER);
                let color = cell.behavior.vertex_color(vertex, cell.global, self.world);
                self.mesh
                    .push_vertex(vertex + cell.local.as_vec3(), normal, rect.remap(uv), color);
            }
            self.mesh.push_indices(cell.def.render_bucket, base, QUAD_INDICES);
        }
    }

    fn emit_baked(&mut self, cell: &CellInstance<'_>, baked: &BakedGeometry) {
        let base = self.mesh.vertex_count() as u32;
        for i in 0..baked.vertex_count() {
            let vertex = cell.rotation.rotate_about(baked.positions[i], CELL_CENTER);
            let normal = cell.rotation.rotate_vec(baked.normals[i]);
            let uv = self.ctx.atlas.rect_for(cell.def, &baked.tags[i]).remap(baked.uvs[i]);
            let color = cell.behavior.vertex_color(vertex, cell.global, self.world);
            self.mesh
                .push_vertex(vertex + cell.local.as_vec3(), normal, uv, color);
        }
        self.mesh
            .push_indices(cell.def.render_bucket, base, baked.indices.iter().copied());
    }

    fn emit_override(&mut self, cell: &CellInstance<'_>, geometry: &OverrideGeometry) {
        let base = self.mesh.vertex_count() as u32;
        for (i, &vertex) in geometry.positions.iter().enumerate() {
            let normal = geometry.normals.get(i).copied().unwrap_or(Vec3::Y);
            let uv = geometry.uvs.get(i).copied().unwrap_or_default();
            let color = cell.behavior.vertex_color(vertex, cell.global, self.world);
            self.mesh
                .push_vertex(vertex + cell.local.as_vec3(), normal, uv, color);
        }
        self.mesh
            .push_indices(cell.def.render_bucket, base, geometry.indices.iter().copied());
    }
}
