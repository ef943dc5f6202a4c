//! The 24 proper rotations of a cube, as a fixed ordered table.
//!
//! Entry `i` is `up(i / 4) * yaw(i % 4)`: first a quarter-turn yaw about +Y,
//! then the rotation that carries +Y onto one of the six axis directions in
//! the order `+Y, -Y, +X, -X, +Z, -Z`. All matrices have exact integer
//! entries, so rotating grid offsets never accumulates error.

use glam::{IVec3, Mat3, Quat, Vec3};

/// Number of entries in the rotation table.
pub const ROTATION_COUNT: usize = 24;

/// Where each up-rotation sends the X, Y and Z axes (matrix columns).
const UP_COLUMNS: [[IVec3; 3]; 6] = [
    // +Y: identity
    [IVec3::X, IVec3::Y, IVec3::Z],
    // -Y: half turn about X
    [IVec3::X, IVec3::NEG_Y, IVec3::NEG_Z],
    // +X: quarter turn about -Z
    [IVec3::NEG_Y, IVec3::X, IVec3::Z],
    // -X: quarter turn about +Z
    [IVec3::Y, IVec3::NEG_X, IVec3::Z],
    // +Z: quarter turn about +X
    [IVec3::X, IVec3::Z, IVec3::NEG_Y],
    // -Z: quarter turn about -X
    [IVec3::X, IVec3::NEG_Z, IVec3::Y],
];

/// Images of the X and Z axes under `k` quarter turns about +Y.
const YAW_XZ: [[IVec3; 2]; 4] = [
    [IVec3::X, IVec3::Z],
    [IVec3::NEG_Z, IVec3::X],
    [IVec3::NEG_X, IVec3::NEG_Z],
    [IVec3::Z, IVec3::NEG_X],
];

/// One entry of the cube rotation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct CubeRotation {
    index: u8,
}

impl CubeRotation {
    /// The identity rotation (table index 0).
    pub const IDENTITY: CubeRotation = CubeRotation { index: 0 };

    /// Returns the table entry at `index`, or `None` if `index >= 24`.
    pub fn from_index(index: u8) -> Option<Self> {
        ((index as usize) < ROTATION_COUNT).then_some(Self { index })
    }

    /// Builds the rotation that points the block's top at `up` after turning
    /// it `yaw` quarter turns about its own vertical axis.
    ///
    /// Returns `None` if `up` is not a unit axis vector.
    pub fn from_up_and_yaw(up: IVec3, yaw: u8) -> Option<Self> {
        let up_index = UP_COLUMNS.iter().position(|cols| cols[1] == up)?;
        Some(Self {
            index: (up_index * 4) as u8 + yaw % 4,
        })
    }

    /// Iterates all 24 table entries in order.
    pub fn all() -> impl Iterator<Item = CubeRotation> {
        (0..ROTATION_COUNT as u8).map(|index| CubeRotation { index })
    }

    /// The table index of this rotation.
    pub fn index(self) -> u8 {
        self.index
    }

    /// The matrix columns: images of the X, Y and Z axes.
    pub fn columns(self) -> [IVec3; 3] {
        let up = &UP_COLUMNS[(self.index / 4) as usize];
        let yaw = &YAW_XZ[(self.index % 4) as usize];
        [apply(up, yaw[0]), up[1], apply(up, yaw[1])]
    }

    /// Rotates an integer offset (e.g. a face normal).
    pub fn rotate_ivec(self, v: IVec3) -> IVec3 {
        apply(&self.columns(), v)
    }

    /// Rotates a vector about the origin.
    pub fn rotate_vec(self, v: Vec3) -> Vec3 {
        self.to_mat3() * v
    }

    /// Rotates a point about `pivot`.
    pub fn rotate_about(self, point: Vec3, pivot: Vec3) -> Vec3 {
        self.rotate_vec(point - pivot) + pivot
    }

    /// Exact 3×3 matrix form.
    pub fn to_mat3(self) -> Mat3 {
        let [x, y, z] = self.columns();
        Mat3::from_cols(x.as_vec3(), y.as_vec3(), z.as_vec3())
    }

    /// Unit quaternion form.
    pub fn to_quat(self) -> Quat {
        Quat::from_mat3(&self.to_mat3()).normalize()
    }
}

fn apply(cols: &[IVec3; 3], v: IVec3) -> IVec3 {
    cols[0] * v.x + cols[1] * v.y + cols[2] * v.z
}

/// Quantizes an orientation to the nearest table entry.
///
/// Similarity is `|dot(q, candidate)|`, which ignores the quaternion sign
/// (`q` and `-q` describe the same rotation). The first entry with the
/// highest similarity wins, so the result is deterministic.
pub fn encode_rotation(orientation: Quat) -> CubeRotation {
    let q = orientation.normalize();
    let mut best = CubeRotation::IDENTITY;
    let mut best_score = f32::NEG_INFINITY;
    for candidate in CubeRotation::all() {
        let score = q.dot(candidate.to_quat()).abs();
        if score > best_score {
            best_score = score;
            best = candidate;
        }
    }
    best
}

/// Looks up the orientation stored in a voxel's rotation byte.
///
/// Out-of-range indices decode to the identity.
pub fn decode_rotation(index: u8) -> CubeRotation {
    CubeRotation::from_index(index).unwrap_or(CubeRotation::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn test_table_has_24_distinct_rotations() {
        let mats: HashSet<[IVec3; 3]> = CubeRotation::all().map(|r| r.columns()).collect();
        assert_eq!(mats.len(), ROTATION_COUNT);
    }

    #[test]
    fn test_every_entry_is_proper_rotation() {
        for r in CubeRotation::all() {
            let det = r.to_mat3().determinant();
            assert!((det - 1.0).abs() < 1e-6, "entry {} has det {det}", r.index());
        }
    }

    #[test]
    fn test_decode_encode_round_trip() {
        for r in CubeRotation::all() {
            let decoded = decode_rotation(r.index());
            assert_eq!(encode_rotation(decoded.to_quat()), r);
        }
    }

    #[test]
    fn test_encode_is_sign_invariant() {
        for r in CubeRotation::all() {
            assert_eq!(encode_rotation(-r.to_quat()), r);
        }
    }

    #[test]
    fn test_identity_is_index_zero() {
        assert_eq!(encode_rotation(Quat::IDENTITY).index(), 0);
        assert_eq!(CubeRotation::IDENTITY.rotate_ivec(IVec3::new(1, 2, 3)), IVec3::new(1, 2, 3));
    }

    #[test]
    fn test_up_axis_of_each_group() {
        let expected = [
            IVec3::Y,
            IVec3::NEG_Y,
            IVec3::X,
            IVec3::NEG_X,
            IVec3::Z,
            IVec3::NEG_Z,
        ];
        for r in CubeRotation::all() {
            assert_eq!(r.rotate_ivec(IVec3::Y), expected[(r.index() / 4) as usize]);
        }
    }

    #[test]
    fn test_from_up_and_yaw_matches_index_layout() {
        let r = CubeRotation::from_up_and_yaw(IVec3::NEG_X, 3).unwrap();
        assert_eq!(r.index(), 15);
        assert!(CubeRotation::from_up_and_yaw(IVec3::new(1, 1, 0), 0).is_none());
    }

    #[test]
    fn test_quat_agrees_with_matrix() {
        for r in CubeRotation::all() {
            for v in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(0.3, -0.7, 0.2)] {
                let a = r.to_quat() * v;
                let b = r.rotate_vec(v);
                assert!((a - b).length() < 1e-5, "entry {} disagrees on {v:?}", r.index());
            }
        }
    }

    #[test]
    fn test_encode_quarter_turns() {
        let yaw = encode_rotation(Quat::from_rotation_y(FRAC_PI_2));
        assert_eq!(yaw.rotate_ivec(IVec3::X), IVec3::NEG_Z);
        let flip = encode_rotation(Quat::from_rotation_x(PI));
        assert_eq!(flip.rotate_ivec(IVec3::Y), IVec3::NEG_Y);
    }

    #[test]
    fn test_encode_tie_is_deterministic() {
        // Exactly halfway between yaw 0 and yaw 1.
        let q = Quat::from_rotation_y(FRAC_PI_4);
        let first = encode_rotation(q);
        for _ in 0..8 {
            assert_eq!(encode_rotation(q), first);
        }
    }

    #[test]
    fn test_rotate_about_center_keeps_unit_cube() {
        let center = Vec3::splat(0.5);
        for r in CubeRotation::all() {
            let p = r.rotate_about(Vec3::new(1.0, 1.0, 0.0), center);
            for c in p.to_array() {
                assert!(c.abs() < 1e-6 || (c - 1.0).abs() < 1e-6, "corner left the cube: {p:?}");
            }
        }
    }

    #[test]
    fn test_out_of_range_decodes_to_identity() {
        assert!(CubeRotation::from_index(24).is_none());
        assert_eq!(decode_rotation(200), CubeRotation::IDENTITY);
    }
}
