//! Material id → texture-atlas rectangle table.
//!
//! Atlas packing happens outside the engine; this table only records where
//! each material ended up.

use glam::Vec2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::registry::BlockTypeDef;

/// A rectangle in normalized atlas UV space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UvRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl UvRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Maps a UV in `[0,1]²` into this rectangle.
    pub fn remap(&self, uv: Vec2) -> Vec2 {
        uv * self.size + self.min
    }
}

/// Lookup from material id to [`UvRect`].
#[derive(Clone, Debug, Default)]
pub struct MaterialAtlas {
    rects: FxHashMap<String, UvRect>,
}

impl MaterialAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lays materials out on a uniform `columns`-wide grid in list order.
    ///
    /// Stands in for a real packer when every texture has the same size.
    pub fn grid<'a>(materials: impl IntoIterator<Item = &'a str>, columns: usize) -> Self {
        let materials: Vec<&str> = materials.into_iter().collect();
        let columns = columns.max(1);
        let rows = materials.len().div_ceil(columns).max(1);
        let cell = Vec2::new(1.0 / columns as f32, 1.0 / rows as f32);

        let mut atlas = Self::new();
        for (i, name) in materials.into_iter().enumerate() {
            let min = Vec2::new((i % columns) as f32, (i / columns) as f32) * cell;
            atlas.insert(name, UvRect::new(min, cell));
        }
        atlas
    }

    /// Records (or replaces) the rectangle for `material`.
    pub fn insert(&mut self, material: &str, rect: UvRect) {
        self.rects.insert(material.to_string(), rect);
    }

    /// Returns the rectangle for a material id.
    pub fn get(&self, material: &str) -> Option<UvRect> {
        self.rects.get(material).copied()
    }

    /// Rectangle for `block`'s face tagged `tag`, using the block's `"*"`
    /// fallback. Unknown materials map to the empty rectangle.
    pub fn rect_for(&self, block: &BlockTypeDef, tag: &str) -> UvRect {
        block
            .material_for(tag)
            .and_then(|material| self.get(material))
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}
