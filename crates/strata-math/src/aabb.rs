//! Axis-aligned bounding boxes with f32 extents.

use glam::Vec3;

/// Axis-aligned box in world units. `min` is componentwise below `max`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanned by two opposite corners, given in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create an AABB from its minimum corner and a non-negative size.
    pub fn from_min_size(min: Vec3, size: Vec3) -> Self {
        Self::new(min, min + size)
    }

    /// The axis-aligned unit cube occupying the voxel cell at `cell`.
    pub fn unit_cell(cell: glam::IVec3) -> Self {
        let min = cell.as_vec3();
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Point containment, boundary included.
    pub fn contains_point(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    /// Returns true if the two boxes share a region of positive volume.
    ///
    /// Boxes that only touch along a face, edge or corner do not overlap.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Distance from `p` to the nearest face along each axis, with the sign of
    /// the component telling which face is nearer (negative = min face).
    ///
    /// Only meaningful for points inside the box.
    pub fn penetration(&self, p: Vec3) -> Vec3 {
        let to_min = p - self.min;
        let to_max = self.max - p;
        Vec3::new(
            if to_min.x < to_max.x { -to_min.x } else { to_max.x },
            if to_min.y < to_max.y { -to_min.y } else { to_max.y },
            if to_min.z < to_max.z { -to_min.z } else { to_max.z },
        )
    }

    /// Returns the size along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Integer cells whose unit cubes intersect this box, as an inclusive
    /// `(min_cell, max_cell)` range.
    pub fn cell_range(&self) -> (glam::IVec3, glam::IVec3) {
        (self.min.floor().as_ivec3(), self.max.floor().as_ivec3())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;

    #[test]
    fn test_new_sorts_corners() {
        let aabb = Aabb::new(Vec3::new(3.0, -1.0, 2.0), Vec3::new(1.0, 4.0, -2.0));
        assert_eq!(aabb.min, Vec3::new(1.0, -1.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(3.0, 4.0, 2.0));
    }

    #[test]
    fn test_contains_point_inclusive_boundary() {
        let aabb = Aabb::unit_cell(IVec3::ZERO);
        assert!(aabb.contains_point(Vec3::new(0.5, 0.5, 0.5)));
        assert!(aabb.contains_point(Vec3::ONE), "max corner is inside");
        assert!(!aabb.contains_point(Vec3::new(1.01, 0.5, 0.5)));
    }

    #[test]
    fn test_touching_boxes_do_not_overlap() {
        let a = Aabb::unit_cell(IVec3::ZERO);
        let b = Aabb::unit_cell(IVec3::new(1, 0, 0));
        assert!(!a.overlaps(&b), "face contact has zero volume");
        assert!(a.contains_point(Vec3::new(1.0, 0.5, 0.5)));
        assert!(b.contains_point(Vec3::new(1.0, 0.5, 0.5)));
    }

    #[test]
    fn test_overlapping_boxes() {
        let a = Aabb::from_min_size(Vec3::ZERO, Vec3::splat(2.0));
        let b = Aabb::from_min_size(Vec3::splat(1.5), Vec3::splat(2.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_penetration_picks_nearest_face() {
        let aabb = Aabb::unit_cell(IVec3::ZERO);
        let pen = aabb.penetration(Vec3::new(0.1, 0.5, 0.95));
        assert!((pen.x + 0.1).abs() < 1e-6, "near the min-x face: {pen:?}");
        assert!((pen.y - 0.5).abs() < 1e-6);
        assert!((pen.z - 0.05).abs() < 1e-6, "near the max-z face: {pen:?}");
    }

    #[test]
    fn test_cell_range_covers_partial_cells() {
        let aabb = Aabb::new(Vec3::new(-0.3, 0.0, 1.2), Vec3::new(0.3, 1.8, 1.8));
        let (lo, hi) = aabb.cell_range();
        assert_eq!(lo, IVec3::new(-1, 0, 1));
        assert_eq!(hi, IVec3::new(0, 1, 1));
    }
}
