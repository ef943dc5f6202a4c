//! Error types for world construction and chunk rebuilds.

use strata_mesh::MeshError;
use strata_terrain::TerrainError;
use strata_voxel::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("block registry: {0}")]
    Registry(#[from] RegistryError),
    #[error("terrain: {0}")]
    Terrain(#[from] TerrainError),
    /// Meshing failed; the chunk keeps its previous mesh and stays dirty.
    #[error("mesh rebuild: {0}")]
    Mesh(#[from] MeshError),
    #[error("noise field is {actual} columns wide, world of radius {radius} needs {expected}")]
    FieldSize {
        radius: u32,
        expected: usize,
        actual: usize,
    },
    #[error("world radius must be at least one chunk")]
    ZeroRadius,
    #[error("rebuild budget must allow at least one chunk per tick")]
    ZeroBudget,
}
