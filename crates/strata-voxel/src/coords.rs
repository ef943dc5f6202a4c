//! Global ↔ chunk coordinate mapping and horizontal wraparound.

use glam::IVec3;

use crate::chunk::CHUNK_SIZE;

const SIZE: i32 = CHUNK_SIZE as i32;

/// Chunk coordinate containing a global voxel position (floor division).
pub fn chunk_of(global: IVec3) -> IVec3 {
    IVec3::new(
        global.x.div_euclid(SIZE),
        global.y.div_euclid(SIZE),
        global.z.div_euclid(SIZE),
    )
}

/// Position of a global voxel inside its chunk; always in `[0, CHUNK_SIZE)`.
pub fn local_of(global: IVec3) -> IVec3 {
    IVec3::new(
        global.x.rem_euclid(SIZE),
        global.y.rem_euclid(SIZE),
        global.z.rem_euclid(SIZE),
    )
}

/// Global position of a chunk's `(0, 0, 0)` cell.
pub fn chunk_origin(chunk: IVec3) -> IVec3 {
    chunk * SIZE
}

/// Reduces a coordinate into `[0, extent)`.
pub fn wrap_coord(value: i32, extent: i32) -> i32 {
    value.rem_euclid(extent)
}

/// Wraps X and Z into `[0, extent)`, leaving Y alone.
pub fn wrap_horizontal(global: IVec3, extent: i32) -> IVec3 {
    IVec3::new(wrap_coord(global.x, extent), global.y, wrap_coord(global.z, extent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_local_round_trip() {
        let mut samples = Vec::new();
        for x in -40..40 {
            for y in [-33, -17, -16, -1, 0, 1, 15, 16, 255, 256] {
                samples.push(IVec3::new(x, y, 37 - x * 3));
            }
        }
        samples.push(IVec3::new(i32::MIN, i32::MAX, -1));
        samples.push(IVec3::new(i32::MAX, i32::MIN, 0));

        for p in samples {
            let local = local_of(p);
            assert!(
                (0..SIZE).contains(&local.x) && (0..SIZE).contains(&local.y) && (0..SIZE).contains(&local.z),
                "local {local} of {p} out of range"
            );
            assert_eq!(chunk_origin(chunk_of(p)) + local, p, "round trip failed for {p}");
        }
    }

    #[test]
    fn test_negative_coordinates_floor() {
        assert_eq!(chunk_of(IVec3::new(-1, -16, -17)), IVec3::new(-1, -1, -2));
        assert_eq!(local_of(IVec3::new(-1, -16, -17)), IVec3::new(15, 0, 15));
    }

    #[test]
    fn test_wrap_horizontal() {
        assert_eq!(wrap_horizontal(IVec3::new(-1, -5, 128), 128), IVec3::new(127, -5, 0));
        assert_eq!(wrap_horizontal(IVec3::new(300, 70, -300), 128), IVec3::new(44, 70, 84));
    }
}
