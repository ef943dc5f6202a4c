//! Sparse voxel grid for collision tests.

use glam::IVec3;
use rustc_hash::FxHashMap;
use strata_voxel::{BlockRegistry, BlockTypeId, VoxelAccess, VoxelCell, builtin_blocks};

pub struct TestGrid {
    pub blocks: BlockRegistry,
    pub cells: FxHashMap<IVec3, VoxelCell>,
}

impl TestGrid {
    pub fn new() -> Self {
        Self {
            blocks: builtin_blocks().unwrap(),
            cells: FxHashMap::default(),
        }
    }

    pub fn id(&self, name: &str) -> BlockTypeId {
        self.blocks.lookup_by_name(name).unwrap()
    }

    pub fn put(&mut self, pos: IVec3, name: &str) {
        let id = self.id(name);
        self.cells.insert(pos, VoxelCell::new(id));
    }

    pub fn put_rotated(&mut self, pos: IVec3, name: &str, rotation: u8) {
        let id = self.id(name);
        self.cells.insert(pos, VoxelCell::rotated(id, rotation));
    }

    /// Stone floor covering `[-r, r]²` at height `y`.
    pub fn floor(&mut self, y: i32, r: i32) {
        for x in -r..=r {
            for z in -r..=r {
                self.put(IVec3::new(x, y, z), "stone");
            }
        }
    }
}

impl VoxelAccess for TestGrid {
    fn cell(&self, pos: IVec3) -> VoxelCell {
        self.cells.get(&pos).copied().unwrap_or(VoxelCell::AIR)
    }

    fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }
}
