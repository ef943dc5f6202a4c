//! Read and write access to voxels by global position.
//!
//! Meshing, collision and block hooks only see the world through these
//! traits, so they can run against a full world or a small test grid.

use glam::IVec3;

use crate::chunk::VoxelCell;
use crate::registry::{BlockRegistry, BlockTypeDef, BlockTypeId};

/// Trait for looking up voxels by global integer position.
pub trait VoxelAccess {
    /// Returns the cell at `pos`. Positions with no data read as air unless
    /// the implementor defines a fallback.
    fn cell(&self, pos: IVec3) -> VoxelCell;

    /// The registry that gives meaning to cell type ids.
    fn blocks(&self) -> &BlockRegistry;

    /// Returns the block type id at `pos`.
    fn block_id(&self, pos: IVec3) -> BlockTypeId {
        self.cell(pos).block
    }

    /// Returns the definition of the block at `pos`, or `None` for an
    /// unregistered id.
    fn block_def(&self, pos: IVec3) -> Option<&BlockTypeDef> {
        self.blocks().get(self.cell(pos).block)
    }

    /// Returns `true` if the block at `pos` is in the opaque bucket.
    fn is_opaque(&self, pos: IVec3) -> bool {
        self.blocks().is_opaque(self.cell(pos).block)
    }
}

/// Voxel access that can also write cells.
pub trait VoxelEdit: VoxelAccess {
    /// Writes a cell. Returns `false` if the write was refused (unloaded
    /// region, unknown type).
    fn set_cell(&mut self, pos: IVec3, block: BlockTypeId, rotation: u8) -> bool;
}
