//! GeometryBaker: flattens a bone hierarchy into one chunk-independent
//! vertex buffer.
//!
//! Bones live in an arena indexed by position in the document. A child is
//! any bone whose parent name equals the bone's name, so duplicate names can
//! form loops. Traversal carries the set of bone indices on the current path
//! and drops any subtree that would revisit one.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use rustc_hash::FxHashSet;

use crate::face::{CubeFace, FACE_UVS, QUAD_INDICES};
use crate::geometry::{CuboidDef, GeometryDocument};

/// Baked, immutable geometry shared by every voxel instance of an id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BakedGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Material tag of the face each vertex belongs to.
    pub tags: Vec<String>,
    pub indices: Vec<u32>,
}

impl BakedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Pivot-centered rotation: `T(pivot) · R(euler) · T(-pivot)`.
fn pivot_rotation(pivot: Vec3, euler_degrees: Vec3) -> Mat4 {
    let rotation = Quat::from_euler(
        EulerRot::YXZ,
        euler_degrees.y.to_radians(),
        euler_degrees.x.to_radians(),
        euler_degrees.z.to_radians(),
    );
    Mat4::from_translation(pivot) * Mat4::from_quat(rotation) * Mat4::from_translation(-pivot)
}

struct Baker<'a> {
    document: &'a GeometryDocument,
    children: Vec<Vec<usize>>,
    reached: Vec<bool>,
    out: BakedGeometry,
}

impl<'a> Baker<'a> {
    fn new(document: &'a GeometryDocument) -> Self {
        let bones = &document.bones;
        let children = bones
            .iter()
            .map(|bone| {
                bones
                    .iter()
                    .enumerate()
                    .filter(|(_, child)| child.parent_name() == Some(bone.name.as_str()))
                    .map(|(index, _)| index)
                    .collect()
            })
            .collect();

        Self {
            document,
            children,
            reached: vec![false; bones.len()],
            out: BakedGeometry::default(),
        }
    }

    fn visit(&mut self, index: usize, parent: Mat4, path: &FxHashSet<usize>) {
        let document = self.document;
        let bone = &document.bones[index];
        let world = parent * pivot_rotation(bone.pivot, bone.rotation);
        self.reached[index] = true;

        for cube in &bone.cubes {
            self.emit_cuboid(cube, world);
        }

        let mut path = path.clone();
        path.insert(index);

        for child in self.children[index].clone() {
            if path.contains(&child) {
                tracing::warn!(
                    geometry = %document.id,
                    bone = %document.bones[child].name,
                    "cyclic bone hierarchy, skipping subtree"
                );
                continue;
            }
            self.visit(child, world, &path);
        }
    }

    fn emit_cuboid(&mut self, cube: &CuboidDef, bone: Mat4) {
        let transform = bone * pivot_rotation(cube.pivot, cube.rotation);

        for face in CubeFace::ALL {
            let Some(uv) = cube.faces.get(face.key()) else {
                continue;
            };
            if !uv.enabled {
                continue;
            }

            let base = self.out.positions.len() as u32;
            let normal = transform
                .transform_vector3(face.normal().as_vec3())
                .normalize_or_zero();
            let tag = if uv.texture.is_empty() { "*" } else { uv.texture.as_str() };

            for (corner, corner_uv) in face.corners().into_iter().zip(FACE_UVS) {
                let local = corner * cube.size + cube.origin;
                self.out.positions.push(transform.transform_point3(local));
                self.out.normals.push(normal);
                self.out.uvs.push(corner_uv * uv.size + uv.min);
                self.out.tags.push(tag.to_string());
            }
            self.out.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        }
    }
}

/// Bake a document into a flat buffer.
///
/// Cyclic subtrees and bones unreachable from any root are skipped with a
/// warning. Baking itself never fails.
pub fn bake_geometry(document: &GeometryDocument) -> BakedGeometry {
    let mut baker = Baker::new(document);
    let roots: Vec<usize> = document
        .bones
        .iter()
        .enumerate()
        .filter(|(_, bone)| bone.parent_name().is_none())
        .map(|(index, _)| index)
        .collect();

    let path = FxHashSet::default();
    for root in roots {
        baker.visit(root, Mat4::IDENTITY, &path);
    }

    for (index, reached) in baker.reached.iter().enumerate() {
        if !reached {
            tracing::warn!(
                geometry = %document.id,
                bone = %document.bones[index].name,
                "bone not reachable from any root"
            );
        }
    }

    baker.out
}
