//! Error types for terrain generation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("noise field side length must be non-zero")]
    EmptyField,
    #[error("failed to spawn noise generation thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("failed to build noise worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("noise generation thread exited without delivering a result")]
    WorkerLost,
    #[error("noise job result was already taken")]
    AlreadyTaken,
    #[error("block type '{0}' is required by terrain generation but not registered")]
    MissingBlock(String),
}
