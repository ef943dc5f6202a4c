//! Dense per-chunk voxel storage.
//!
//! Every cell holds a block type id and a rotation index. Storage is a flat
//! array indexed with X varying fastest.

use glam::IVec3;

use crate::registry::BlockTypeId;

/// Edge length of a cubic chunk, in voxels.
pub const CHUNK_SIZE: usize = 16;
/// Number of cells in one chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// One grid cell: block type plus one of the 24 cube rotations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct VoxelCell {
    pub block: BlockTypeId,
    pub rotation: u8,
}

impl VoxelCell {
    /// The empty cell.
    pub const AIR: VoxelCell = VoxelCell {
        block: BlockTypeId::AIR,
        rotation: 0,
    };

    /// An unrotated cell of type `block`.
    pub fn new(block: BlockTypeId) -> Self {
        Self { block, rotation: 0 }
    }

    /// A cell of type `block` with the given rotation index.
    pub fn rotated(block: BlockTypeId, rotation: u8) -> Self {
        Self { block, rotation }
    }

    /// Returns `true` for the empty type.
    pub fn is_air(&self) -> bool {
        self.block == BlockTypeId::AIR
    }
}

/// Dense `CHUNK_SIZE³` grid of [`VoxelCell`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    cells: Box<[VoxelCell]>,
}

impl ChunkData {
    /// Creates a chunk where every cell is air.
    pub fn new_air() -> Self {
        Self::filled(VoxelCell::AIR)
    }

    /// Creates a chunk where every cell is `cell`.
    pub fn filled(cell: VoxelCell) -> Self {
        Self {
            cells: vec![cell; CHUNK_VOLUME].into_boxed_slice(),
        }
    }

    /// Builds a chunk by asking `f` for every local position.
    pub fn from_fn(mut f: impl FnMut(IVec3) -> VoxelCell) -> Self {
        let cells = (0..CHUNK_VOLUME).map(|i| f(Self::position_of(i))).collect();
        Self { cells }
    }

    /// Returns `true` if `local` lies inside `[0, CHUNK_SIZE)` on every axis.
    pub fn in_bounds(local: IVec3) -> bool {
        let size = CHUNK_SIZE as i32;
        local.x >= 0
            && local.y >= 0
            && local.z >= 0
            && local.x < size
            && local.y < size
            && local.z < size
    }

    /// Returns the cell at `local`, or `None` if out of bounds.
    pub fn get(&self, local: IVec3) -> Option<VoxelCell> {
        Self::in_bounds(local).then(|| self.cells[Self::linear_index(local)])
    }

    /// Writes the cell at `local`. Returns `false` (and leaves the chunk
    /// untouched) if `local` is out of bounds.
    pub fn set(&mut self, local: IVec3, cell: VoxelCell) -> bool {
        if !Self::in_bounds(local) {
            tracing::warn!("ChunkData::set out of bounds: {}", local);
            return false;
        }
        self.cells[Self::linear_index(local)] = cell;
        true
    }

    /// Iterates `(local_position, cell)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec3, VoxelCell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Self::position_of(i), *cell))
    }

    /// Number of non-air cells.
    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_air()).count()
    }

    /// Returns `true` if every cell is air.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(VoxelCell::is_air)
    }

    /// Converts local `(x, y, z)` to a flat array index.
    fn linear_index(local: IVec3) -> usize {
        local.x as usize + local.y as usize * CHUNK_SIZE + local.z as usize * CHUNK_SIZE * CHUNK_SIZE
    }

    fn position_of(index: usize) -> IVec3 {
        IVec3::new(
            (index % CHUNK_SIZE) as i32,
            ((index / CHUNK_SIZE) % CHUNK_SIZE) as i32,
            (index / (CHUNK_SIZE * CHUNK_SIZE)) as i32,
        )
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        Self::new_air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = ChunkData::new_air();
        assert!(chunk.is_empty());
        assert_eq!(chunk.get(IVec3::new(3, 4, 5)), Some(VoxelCell::AIR));
    }

    #[test]
    fn test_set_and_get() {
        let mut chunk = ChunkData::new_air();
        let cell = VoxelCell::rotated(BlockTypeId(7), 5);
        assert!(chunk.set(IVec3::new(15, 0, 9), cell));
        assert_eq!(chunk.get(IVec3::new(15, 0, 9)), Some(cell));
        assert_eq!(chunk.solid_count(), 1);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut chunk = ChunkData::new_air();
        assert_eq!(chunk.get(IVec3::new(16, 0, 0)), None);
        assert_eq!(chunk.get(IVec3::new(0, -1, 0)), None);
        assert!(!chunk.set(IVec3::new(0, 0, 16), VoxelCell::new(BlockTypeId(1))));
        assert!(chunk.is_empty(), "out-of-bounds write must not land anywhere");
    }

    #[test]
    fn test_from_fn_visits_every_position_once() {
        let mut seen = std::collections::HashSet::new();
        let chunk = ChunkData::from_fn(|p| {
            assert!(seen.insert(p), "position {p} visited twice");
            if p.y < 4 { VoxelCell::new(BlockTypeId(1)) } else { VoxelCell::AIR }
        });
        assert_eq!(seen.len(), CHUNK_VOLUME);
        assert_eq!(chunk.solid_count(), 4 * CHUNK_SIZE * CHUNK_SIZE);
    }

    #[test]
    fn test_iter_matches_get() {
        let chunk = ChunkData::from_fn(|p| VoxelCell::new(BlockTypeId((p.x + p.y * 3 + p.z * 7) as u32)));
        for (pos, cell) in chunk.iter() {
            assert_eq!(chunk.get(pos), Some(cell));
        }
    }
}
