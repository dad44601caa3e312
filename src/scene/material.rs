use crate::foundation::ids::MaterialId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Linear-space RGBA color value of a shader property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Rgba {
    /// Build a color from components.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Scale the color channels by `k`, leaving alpha untouched.
    pub fn scaled_rgb(self, k: f32) -> Self {
        Self {
            r: self.r * k,
            g: self.g * k,
            b: self.b * k,
            a: self.a,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Reference to an external texture slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureRef {
    /// Source identifier of the texture asset.
    pub source: String,
}

impl TextureRef {
    /// Reference a texture by source identifier.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Shader material as a guarded property bag.
///
/// Properties are keyed by shader property name. Every read is guarded:
/// absent properties yield `None`, so partial conversion between shading
/// models never fails on a missing slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Shading model identifier.
    pub shader: String,
    colors: BTreeMap<String, Rgba>,
    floats: BTreeMap<String, f32>,
    textures: BTreeMap<String, TextureRef>,
}

impl Material {
    /// Create an empty material for the given shading model.
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            colors: BTreeMap::new(),
            floats: BTreeMap::new(),
            textures: BTreeMap::new(),
        }
    }

    /// True when a color property named `key` exists.
    pub fn has_color(&self, key: &str) -> bool {
        self.colors.contains_key(key)
    }

    /// True when a float property named `key` exists.
    pub fn has_float(&self, key: &str) -> bool {
        self.floats.contains_key(key)
    }

    /// True when a texture property named `key` exists.
    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    /// Color property value, if present.
    pub fn color(&self, key: &str) -> Option<Rgba> {
        self.colors.get(key).copied()
    }

    /// Float property value, if present.
    pub fn float(&self, key: &str) -> Option<f32> {
        self.floats.get(key).copied()
    }

    /// Texture property value, if present.
    pub fn texture(&self, key: &str) -> Option<&TextureRef> {
        self.textures.get(key)
    }

    /// Set (or overwrite) a color property.
    pub fn set_color(&mut self, key: impl Into<String>, value: Rgba) -> &mut Self {
        self.colors.insert(key.into(), value);
        self
    }

    /// Set (or overwrite) a float property.
    pub fn set_float(&mut self, key: impl Into<String>, value: f32) -> &mut Self {
        self.floats.insert(key.into(), value);
        self
    }

    /// Set (or overwrite) a texture property.
    pub fn set_texture(&mut self, key: impl Into<String>, value: TextureRef) -> &mut Self {
        self.textures.insert(key.into(), value);
        self
    }

    /// All color properties in key order.
    pub fn colors(&self) -> &BTreeMap<String, Rgba> {
        &self.colors
    }

    /// All float properties in key order.
    pub fn floats(&self) -> &BTreeMap<String, f32> {
        &self.floats
    }

    /// All texture properties in key order.
    pub fn textures(&self) -> &BTreeMap<String, TextureRef> {
        &self.textures
    }
}

/// Indexed material store owned beside the scene graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialStore {
    materials: Vec<Material>,
}

impl MaterialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material, returning its id.
    pub fn add(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(u32::try_from(self.materials.len()).expect("material store overflow"));
        self.materials.push(material);
        id
    }

    /// Borrow a material by id.
    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    /// Mutably borrow a material by id.
    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    /// Number of materials in the store.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True when the store holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Iterate `(id, material)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i as u32), m))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/material.rs"]
mod tests;
