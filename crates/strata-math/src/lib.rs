//! Small math layer for the voxel engine: float bounding boxes and the
//! discrete cube rotation table.

mod aabb;
mod rotation;

pub use aabb::Aabb;
pub use rotation::{CubeRotation, ROTATION_COUNT, decode_rotation, encode_rotation};
