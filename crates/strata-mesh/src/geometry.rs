//! Geometry source documents: a bone hierarchy carrying textured cuboids.
//!
//! Documents are JSON. Positions and sizes are in block units, rotations
//! are Euler angles in degrees applied about the owning pivot. Per-face UVs
//! are in `[0, 1]` and get remapped through a block's material rectangle
//! when the geometry is instanced.

use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::MeshError;

/// A named geometry asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeometryDocument {
    pub id: String,
    #[serde(default)]
    pub bones: Vec<BoneDef>,
}

impl GeometryDocument {
    /// Parses a document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, MeshError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One bone: a pivot-centered rotation and the cuboids it carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneDef {
    pub name: String,
    /// Name of the parent bone. Missing or empty means root.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub pivot: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default)]
    pub cubes: Vec<CuboidDef>,
}

impl BoneDef {
    /// Parent name, treating the empty string as no parent.
    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_deref().filter(|name| !name.is_empty())
    }
}

/// An axis-aligned box in bone space, optionally rotated about its own pivot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CuboidDef {
    pub origin: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub pivot: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    /// Face key (`"north"`, `"top"`, ...) to UV entry. Faces without an
    /// entry are not emitted.
    #[serde(default)]
    pub faces: BTreeMap<String, FaceUv>,
}

/// UV placement and material tag of one cuboid face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceUv {
    #[serde(default)]
    pub min: Vec2,
    #[serde(default = "FaceUv::full_size")]
    pub size: Vec2,
    /// Material tag looked up on the block; empty falls back to `"*"`.
    #[serde(default)]
    pub texture: String,
    #[serde(default = "FaceUv::enabled_by_default")]
    pub enabled: bool,
}

impl FaceUv {
    fn full_size() -> Vec2 {
        Vec2::ONE
    }

    fn enabled_by_default() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let doc = GeometryDocument::from_json(
            r#"{
                "id": "box",
                "bones": [{
                    "name": "root",
                    "cubes": [{
                        "origin": [0, 0, 0],
                        "size": [1, 1, 1],
                        "faces": { "top": {}, "north": { "enabled": false } }
                    }]
                }]
            }"#,
        )
        .unwrap();
        let bone = &doc.bones[0];
        assert_eq!(bone.parent_name(), None);
        assert_eq!(bone.pivot, Vec3::ZERO);
        let top = &bone.cubes[0].faces["top"];
        assert_eq!(top.size, Vec2::ONE);
        assert!(top.enabled);
        assert!(!bone.cubes[0].faces["north"].enabled);
    }

    #[test]
    fn test_empty_parent_is_root() {
        let bone = BoneDef {
            name: "a".into(),
            parent: Some(String::new()),
            pivot: Vec3::ZERO,
            rotation: Vec3::ZERO,
            cubes: Vec::new(),
        };
        assert_eq!(bone.parent_name(), None);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = GeometryDocument::from_json("{ \"id\": 3 }").unwrap_err();
        assert!(matches!(err, MeshError::Parse(_)));
    }
}
