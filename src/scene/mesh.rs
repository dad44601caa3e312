use crate::foundation::ids::{MaterialId, MeshId, NodeIdx};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// A single morph target (blendshape) on a mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorphTarget {
    /// Author-chosen morph name, free-form and possibly multi-lingual.
    pub name: String,
}

impl MorphTarget {
    /// Create a named morph target.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Skin binding of a mesh: bone nodes plus per-bone bindpose matrices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skin {
    /// Bone nodes, index-aligned with [`Skin::bindposes`].
    pub bones: Vec<NodeIdx>,
    /// Per-bone bindpose matrices (mesh space -> bone space at bind time).
    pub bindposes: Vec<Mat4>,
}

/// A mesh asset referenced by scene nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    /// Asset name.
    pub name: String,
    /// Materials applied to this mesh, in submesh order.
    #[serde(default)]
    pub materials: Vec<MaterialId>,
    /// Morph targets in declaration order.
    #[serde(default)]
    pub morphs: Vec<MorphTarget>,
    /// Skin binding for skinned meshes.
    #[serde(default)]
    pub skin: Option<Skin>,
}

impl Mesh {
    /// Create a bare mesh with no materials, morphs, or skin.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            materials: Vec::new(),
            morphs: Vec::new(),
            skin: None,
        }
    }
}

/// Indexed mesh asset store owned beside the scene graph.
///
/// Assets are shared: several nodes may reference one id. Stages that must
/// rewrite an asset duplicate it first so originals referenced elsewhere are
/// never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mesh, returning its id.
    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(u32::try_from(self.meshes.len()).expect("mesh store overflow"));
        self.meshes.push(mesh);
        id
    }

    /// Borrow a mesh by id.
    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0 as usize)
    }

    /// Mutably borrow a mesh by id.
    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0 as usize)
    }

    /// Clone the mesh behind `id` into a new, independently owned asset.
    pub fn duplicate(&mut self, id: MeshId) -> Option<MeshId> {
        let copy = self.meshes.get(id.0 as usize)?.clone();
        Some(self.add(copy))
    }

    /// Number of meshes in the store.
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True when the store holds no meshes.
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Iterate `(id, mesh)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes
            .iter()
            .enumerate()
            .map(|(i, m)| (MeshId(i as u32), m))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/mesh.rs"]
mod tests;
