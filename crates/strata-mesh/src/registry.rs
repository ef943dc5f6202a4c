//! Geometry id → baked geometry lookup, built once before world use.

use rustc_hash::FxHashMap;

use crate::baker::{BakedGeometry, bake_geometry};
use crate::error::MeshError;
use crate::geometry::GeometryDocument;

/// Source documents for the built-in block geometry.
pub const BUILTIN_GEOMETRY: [&str; 5] = [
    include_str!("../assets/geometry/arrow_block.json"),
    include_str!("../assets/geometry/chest.json"),
    include_str!("../assets/geometry/grass.json"),
    include_str!("../assets/geometry/stone_slab.json"),
    include_str!("../assets/geometry/stone_stair.json"),
];

/// Immutable table of baked geometry, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct GeometryRegistry {
    baked: FxHashMap<String, BakedGeometry>,
}

impl GeometryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every document in [`BUILTIN_GEOMETRY`].
    pub fn builtin() -> Result<Self, MeshError> {
        let mut registry = Self::new();
        for source in BUILTIN_GEOMETRY {
            registry.load_json(source)?;
        }
        Ok(registry)
    }

    /// Parses, bakes and stores a document. Returns its id.
    ///
    /// A document with an id that is already present replaces it.
    pub fn load_json(&mut self, source: &str) -> Result<String, MeshError> {
        let document = GeometryDocument::from_json(source)?;
        let baked = bake_geometry(&document);
        tracing::debug!(
            id = %document.id,
            vertices = baked.vertex_count(),
            "baked geometry"
        );
        self.insert(&document.id, baked);
        Ok(document.id)
    }

    pub fn insert(&mut self, id: &str, baked: BakedGeometry) {
        self.baked.insert(id.to_string(), baked);
    }

    pub fn get(&self, id: &str) -> Option<&BakedGeometry> {
        self.baked.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.baked.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.baked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baked.is_empty()
    }
}
