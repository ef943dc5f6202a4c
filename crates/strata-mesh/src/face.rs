//! Unit-cube face tables shared by the chunk mesher and the geometry baker.

use glam::{IVec3, Vec2, Vec3};

/// The eight corners of the unit cube.
pub const CUBE_CORNERS: [Vec3; 8] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(0.0, 0.0, 1.0),
    Vec3::new(1.0, 0.0, 0.0),
    Vec3::new(1.0, 0.0, 1.0),
    Vec3::new(0.0, 1.0, 0.0),
    Vec3::new(0.0, 1.0, 1.0),
    Vec3::new(1.0, 1.0, 0.0),
    Vec3::new(1.0, 1.0, 1.0),
];

/// Per-corner UVs of a face quad, in corner order.
pub const FACE_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
];

/// Two triangles over the four quad corners.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// One of the six faces of a unit cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CubeFace {
    /// −Z.
    South = 0,
    /// +Z.
    North = 1,
    /// +X.
    East = 2,
    /// −X.
    West = 3,
    /// +Y.
    Top = 4,
    /// −Y.
    Bottom = 5,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        Self::South,
        Self::North,
        Self::East,
        Self::West,
        Self::Top,
        Self::Bottom,
    ];

    /// Outward unit normal.
    pub fn normal(self) -> IVec3 {
        match self {
            Self::South => IVec3::NEG_Z,
            Self::North => IVec3::Z,
            Self::East => IVec3::X,
            Self::West => IVec3::NEG_X,
            Self::Top => IVec3::Y,
            Self::Bottom => IVec3::NEG_Y,
        }
    }

    /// Indices into [`CUBE_CORNERS`] for the face quad, in [`FACE_UVS`] order.
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            Self::South => [0, 4, 2, 6],
            Self::North => [3, 7, 1, 5],
            Self::East => [2, 6, 3, 7],
            Self::West => [1, 5, 0, 4],
            Self::Top => [4, 5, 6, 7],
            Self::Bottom => [1, 0, 3, 2],
        }
    }

    /// The four corner positions of the face quad.
    pub fn corners(self) -> [Vec3; 4] {
        self.corner_indices().map(|i| CUBE_CORNERS[i])
    }

    /// Face key used by geometry documents and material tags.
    pub fn key(self) -> &'static str {
        match self {
            Self::South => "south",
            Self::North => "north",
            Self::East => "east",
            Self::West => "west",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Parses a face key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|face| face.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_lie_on_face_plane() {
        for face in CubeFace::ALL {
            let n = face.normal().as_vec3();
            let plane = if n.max_element() > 0.0 { 1.0 } else { 0.0 };
            for corner in face.corners() {
                let along = corner.dot(n.abs());
                assert_eq!(along, plane, "{face:?} corner {corner} off its plane");
            }
        }
    }

    #[test]
    fn test_winding_matches_normal() {
        for face in CubeFace::ALL {
            let [a, b, c, _] = face.corners();
            let n = (b - a).cross(c - a).normalize();
            assert_eq!(n, face.normal().as_vec3(), "{face:?} triangle faces the wrong way");
        }
    }

    #[test]
    fn test_key_round_trip() {
        for face in CubeFace::ALL {
            assert_eq!(CubeFace::from_key(face.key()), Some(face));
        }
        assert_eq!(CubeFace::from_key("up"), None);
    }
}
