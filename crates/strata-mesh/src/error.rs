//! Error types for geometry loading and chunk meshing.

use glam::IVec3;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    /// A cell holds a type id the block registry does not know.
    #[error("unregistered block type {block} at {position}")]
    UnknownBlock { block: u32, position: IVec3 },
    /// A block names geometry that was never baked.
    #[error("block '{block}' references unknown geometry '{geometry}'")]
    UnknownGeometry { block: String, geometry: String },
    #[error("malformed geometry document: {0}")]
    Parse(#[from] serde_json::Error),
}
