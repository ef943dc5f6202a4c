//! The voxel world: loaded chunks keyed by chunk coordinate, voxel reads with
//! a procedural fallback for unloaded regions, deferred remeshing through a
//! dirty queue, and the per-tick update.
//!
//! Edits never remesh synchronously. They mark the owning chunk (and any
//! loaded neighbor sharing the edited face) dirty, and [`VoxelWorld::tick`]
//! rebuilds at most `rebuild_budget` chunks per call.

use std::collections::BTreeSet;
use std::sync::Arc;

use glam::IVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;
use strata_math::ROTATION_COUNT;
use strata_mesh::{GeometryRegistry, MeshContext, mesh_chunk};
use strata_terrain::{
    NoiseField, NoiseJob, NoiseSettings, TerrainPalette, WATER_LEVEL, WORLD_MAX_Y, surface_height,
    terrain_block,
};
use strata_voxel::{
    BlockRegistry, BlockTypeDef, BlockTypeId, CHUNK_SIZE, ChunkData, MaterialAtlas, TickFn,
    VoxelAccess, VoxelCell, VoxelEdit, builtin_atlas, builtin_blocks, chunk_of, chunk_origin,
    local_of, wrap_horizontal,
};

use crate::chunk::Chunk;
use crate::dirty::DirtyQueue;
use crate::error::WorldError;

/// Horizontal world size in chunks when none is configured.
pub const DEFAULT_RADIUS: u32 = 8;
/// Chunks stacked per column: covers rows `0..=255`.
pub const DEFAULT_VERTICAL_CHUNKS: u32 = 16;
/// Chunks remeshed per tick.
pub const DEFAULT_REBUILD_BUDGET: usize = 100;

/// Immutable lookup tables shared by every chunk of a world.
pub struct WorldAssets {
    pub blocks: BlockRegistry,
    pub geometries: GeometryRegistry,
    pub atlas: MaterialAtlas,
}

impl WorldAssets {
    /// The built-in block set, its baked geometry, and the material atlas.
    pub fn builtin() -> Result<Self, WorldError> {
        Ok(Self {
            blocks: builtin_blocks()?,
            geometries: GeometryRegistry::builtin()?,
            atlas: builtin_atlas(),
        })
    }

    pub fn mesh_context(&self) -> MeshContext<'_> {
        MeshContext {
            blocks: &self.blocks,
            geometries: &self.geometries,
            atlas: &self.atlas,
        }
    }
}

/// Shape and scheduling parameters of a world.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldSettings {
    /// Horizontal size in chunks along X and Z.
    pub radius: u32,
    /// Chunk layers generated above y = 0.
    pub vertical_chunks: u32,
    /// Most chunks remeshed by one tick.
    pub rebuild_budget: usize,
    /// Seed of the block-tick random stream.
    pub seed: u64,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            vertical_chunks: DEFAULT_VERTICAL_CHUNKS,
            rebuild_budget: DEFAULT_REBUILD_BUDGET,
            seed: 0,
        }
    }
}

impl WorldSettings {
    /// Horizontal size in voxels; also the noise field side length.
    pub fn extent(&self) -> usize {
        self.radius as usize * CHUNK_SIZE
    }

    fn validate(&self) -> Result<(), WorldError> {
        if self.radius == 0 {
            return Err(WorldError::ZeroRadius);
        }
        if self.rebuild_budget == 0 {
            return Err(WorldError::ZeroBudget);
        }
        Ok(())
    }
}

/// What one call to [`VoxelWorld::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// Chunks remeshed this tick.
    pub rebuilt: usize,
    /// Chunks still waiting after the budget ran out.
    pub pending: usize,
    /// Block tick hooks that ran.
    pub block_updates: usize,
}

pub struct VoxelWorld {
    assets: Arc<WorldAssets>,
    settings: WorldSettings,
    field: NoiseField,
    palette: TerrainPalette,
    chunks: FxHashMap<IVec3, Chunk>,
    dirty: DirtyQueue,
    /// Positions holding a block with a tick hook, in deterministic order.
    scheduled: BTreeSet<[i32; 3]>,
    tick_count: u64,
    rng: ChaCha8Rng,
}

impl VoxelWorld {
    /// Builds every chunk of the world from an already generated field.
    ///
    /// All chunks start dirty; call [`rebuild_all`](Self::rebuild_all) for an
    /// up-front mesh or let [`tick`](Self::tick) work through them.
    pub fn new(
        assets: Arc<WorldAssets>,
        field: NoiseField,
        settings: WorldSettings,
    ) -> Result<Self, WorldError> {
        settings.validate()?;
        let expected = settings.extent();
        if field.size() != expected {
            return Err(WorldError::FieldSize {
                radius: settings.radius,
                expected,
                actual: field.size(),
            });
        }
        let palette = TerrainPalette::from_registry(&assets.blocks)?;
        let rng = ChaCha8Rng::seed_from_u64(settings.seed);

        let mut world = Self {
            assets,
            settings,
            field,
            palette,
            chunks: FxHashMap::default(),
            dirty: DirtyQueue::new(),
            scheduled: BTreeSet::new(),
            tick_count: 0,
            rng,
        };
        world.populate();
        Ok(world)
    }

    /// Generates the noise field on a worker pool, waits for it, and builds
    /// the world.
    pub fn generate(
        assets: Arc<WorldAssets>,
        noise: &NoiseSettings,
        settings: WorldSettings,
        threads: usize,
    ) -> Result<Self, WorldError> {
        settings.validate()?;
        let field = NoiseJob::spawn(settings.extent(), noise.clone(), threads)?.complete()?;
        Self::new(assets, field, settings)
    }

    fn populate(&mut self) {
        let radius = self.settings.radius as i32;
        for cy in 0..self.settings.vertical_chunks as i32 {
            for cz in 0..radius {
                for cx in 0..radius {
                    let coord = IVec3::new(cx, cy, cz);
                    let chunk = Chunk::new(coord, self.generate_chunk(coord));
                    self.chunks.insert(coord, chunk);
                    self.dirty.enqueue(coord);
                }
            }
        }
        tracing::info!(
            chunks = self.chunks.len(),
            extent = self.settings.extent(),
            "world populated"
        );
    }

    fn generate_chunk(&self, coord: IVec3) -> ChunkData {
        let origin = chunk_origin(coord);
        ChunkData::from_fn(|local| {
            VoxelCell::new(terrain_block(&self.field, origin + local, &self.palette))
        })
    }

    fn in_generated_range(&self, coord: IVec3) -> bool {
        let radius = self.settings.radius as i32;
        (0..radius).contains(&coord.x)
            && (0..radius).contains(&coord.z)
            && (0..self.settings.vertical_chunks as i32).contains(&coord.y)
    }

    // -- reads ----------------------------------------------------------------

    /// Cell at `pos`. Unloaded positions read what generation would put
    /// there: air outside rows `0..=255`, stone past the horizontal extent,
    /// classified terrain otherwise.
    pub fn get_cell(&self, pos: IVec3) -> VoxelCell {
        match self.chunks.get(&chunk_of(pos)) {
            Some(chunk) => chunk.data.get(local_of(pos)).unwrap_or(VoxelCell::AIR),
            None => VoxelCell::new(terrain_block(&self.field, pos, &self.palette)),
        }
    }

    pub fn get_voxel(&self, pos: IVec3) -> BlockTypeId {
        self.get_cell(pos).block
    }

    pub fn get_block_type(&self, pos: IVec3) -> Option<&BlockTypeDef> {
        self.assets.blocks.get(self.get_voxel(pos))
    }

    // -- writes ---------------------------------------------------------------

    /// Writes a cell and queues the affected chunks for remeshing.
    ///
    /// Returns `false` without changing anything when the chunk is not loaded,
    /// the type is unregistered, or the rotation index is out of range.
    pub fn set_block_type(&mut self, pos: IVec3, block: BlockTypeId, rotation: u8) -> bool {
        if !self.assets.blocks.contains(block) {
            tracing::warn!(block = block.0, ?pos, "refusing write of unregistered block type");
            return false;
        }
        if rotation as usize >= ROTATION_COUNT {
            tracing::warn!(rotation, ?pos, "refusing write with invalid rotation index");
            return false;
        }
        let coord = chunk_of(pos);
        let local = local_of(pos);
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            tracing::warn!(?pos, "write to unloaded chunk ignored");
            return false;
        };
        chunk.data.set(local, VoxelCell::rotated(block, rotation));
        chunk.dirty = true;
        self.dirty.enqueue(coord);

        for neighbor in boundary_neighbors(coord, local) {
            self.mark_dirty(neighbor);
        }
        self.update_schedule(pos, block);
        true
    }

    fn mark_dirty(&mut self, coord: IVec3) {
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.dirty = true;
            self.dirty.enqueue(coord);
        }
    }

    fn mark_face_neighbors_dirty(&mut self, coord: IVec3) {
        for step in [IVec3::X, IVec3::NEG_X, IVec3::Y, IVec3::NEG_Y, IVec3::Z, IVec3::NEG_Z] {
            self.mark_dirty(coord + step);
        }
    }

    fn update_schedule(&mut self, pos: IVec3, block: BlockTypeId) {
        if self.assets.blocks.behavior(block).has_tick_behavior() {
            self.scheduled.insert(pos.to_array());
        } else {
            self.scheduled.remove(&pos.to_array());
        }
    }

    // -- meshing --------------------------------------------------------------

    /// Remeshes one chunk now. Returns `Ok(false)` if it is not loaded.
    ///
    /// On error the chunk keeps its previous mesh, stays dirty, and is queued
    /// again at the back.
    pub fn rebuild_chunk(&mut self, coord: IVec3) -> Result<bool, WorldError> {
        let Some(chunk) = self.chunks.get(&coord) else {
            self.dirty.remove(coord);
            return Ok(false);
        };
        let mesh = match mesh_chunk(self.assets.mesh_context(), &chunk.data, chunk.origin(), &*self)
        {
            Ok(mesh) => mesh,
            Err(e) => {
                self.dirty.enqueue(coord);
                tracing::warn!(?coord, error = %e, "chunk rebuild failed");
                return Err(e.into());
            }
        };

        let vertices = mesh.vertex_count();
        if let Some(chunk) = self.chunks.get_mut(&coord) {
            chunk.mesh = mesh;
            chunk.dirty = false;
        }
        self.dirty.remove(coord);
        tracing::debug!(?coord, vertices, "chunk rebuilt");
        Ok(true)
    }

    /// Drains the whole dirty queue, ignoring the per-tick budget.
    pub fn rebuild_all(&mut self) -> Result<usize, WorldError> {
        let mut rebuilt = 0;
        while let Some(coord) = self.dirty.pop() {
            if self.rebuild_chunk(coord)? {
                rebuilt += 1;
            }
        }
        Ok(rebuilt)
    }

    // -- simulation -----------------------------------------------------------

    /// Advances the world one tick: remeshes up to the budget, then runs the
    /// block tick hooks that are due.
    pub fn tick(&mut self) -> Result<TickReport, WorldError> {
        self.tick_count += 1;

        let mut rebuilt = 0;
        while rebuilt < self.settings.rebuild_budget {
            let Some(coord) = self.dirty.pop() else {
                break;
            };
            if self.rebuild_chunk(coord)? {
                rebuilt += 1;
            }
        }

        let block_updates = self.run_block_ticks();
        let report = TickReport {
            tick: self.tick_count,
            rebuilt,
            pending: self.dirty.len(),
            block_updates,
        };
        if rebuilt > 0 || block_updates > 0 {
            tracing::debug!(
                tick = report.tick,
                rebuilt,
                pending = report.pending,
                block_updates,
                "world tick"
            );
        }
        Ok(report)
    }

    fn run_block_ticks(&mut self) -> usize {
        let due: Vec<(IVec3, TickFn)> = self
            .scheduled
            .iter()
            .map(|&[x, y, z]| IVec3::new(x, y, z))
            .filter_map(|pos| {
                let tick = self.assets.blocks.behavior(self.get_voxel(pos)).tick?;
                (tick.interval > 0 && self.tick_count % tick.interval == 0)
                    .then_some((pos, tick.on_tick))
            })
            .collect();

        let mut rng = self.rng.clone();
        for &(pos, on_tick) in &due {
            on_tick(pos, &mut *self, &mut rng);
        }
        self.rng = rng;
        due.len()
    }

    // -- loading --------------------------------------------------------------

    /// Drops a chunk together with its mesh. Reads fall back to generation
    /// until it is loaded again; edits made to it are lost.
    pub fn unload_chunk(&mut self, coord: IVec3) -> bool {
        if self.chunks.remove(&coord).is_none() {
            return false;
        }
        self.dirty.remove(coord);
        self.scheduled
            .retain(|&[x, y, z]| chunk_of(IVec3::new(x, y, z)) != coord);
        self.mark_face_neighbors_dirty(coord);
        tracing::debug!(?coord, "chunk unloaded");
        true
    }

    /// Regenerates a chunk inside the world extent that is not loaded.
    pub fn load_chunk(&mut self, coord: IVec3) -> bool {
        if self.chunks.contains_key(&coord) || !self.in_generated_range(coord) {
            return false;
        }
        let chunk = Chunk::new(coord, self.generate_chunk(coord));
        self.chunks.insert(coord, chunk);
        self.dirty.enqueue(coord);
        self.mark_face_neighbors_dirty(coord);
        true
    }

    /// First air cell above the terrain surface of column `(x, z)`, after
    /// wrapping the column into the world. Columns under water spawn above
    /// the water line.
    pub fn spawn_position(&self, x: i32, z: i32) -> IVec3 {
        let column = wrap_horizontal(IVec3::new(x, 0, z), self.settings.extent() as i32);
        let surface = surface_height(self.field.get(column.x, column.z).height);
        let mut y = surface.max(WATER_LEVEL) + 1;
        while y <= WORLD_MAX_Y && self.get_voxel(column.with_y(y)) != BlockTypeId::AIR {
            y += 1;
        }
        column.with_y(y)
    }

    // -- accessors ------------------------------------------------------------

    pub fn assets(&self) -> &Arc<WorldAssets> {
        &self.assets
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn field(&self) -> &NoiseField {
        &self.field
    }

    pub fn palette(&self) -> &TerrainPalette {
        &self.palette
    }

    pub fn chunk(&self, coord: IVec3) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks.values()
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn pending_rebuilds(&self) -> usize {
        self.dirty.len()
    }

    pub fn is_pending(&self, coord: IVec3) -> bool {
        self.dirty.contains(coord)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl VoxelAccess for VoxelWorld {
    fn cell(&self, pos: IVec3) -> VoxelCell {
        self.get_cell(pos)
    }

    fn blocks(&self) -> &BlockRegistry {
        &self.assets.blocks
    }
}

impl VoxelEdit for VoxelWorld {
    fn set_cell(&mut self, pos: IVec3, block: BlockTypeId, rotation: u8) -> bool {
        self.set_block_type(pos, block, rotation)
    }
}

/// Chunks sharing a face with the edited cell, when it lies on its chunk's
/// boundary. Their culling reads across that face.
fn boundary_neighbors(coord: IVec3, local: IVec3) -> Vec<IVec3> {
    let last = CHUNK_SIZE as i32 - 1;
    let mut neighbors = Vec::new();
    for axis in 0..3 {
        let mut step = IVec3::ZERO;
        if local[axis] == 0 {
            step[axis] = -1;
        } else if local[axis] == last {
            step[axis] = 1;
        } else {
            continue;
        }
        neighbors.push(coord + step);
    }
    neighbors
}
