use crate::foundation::error::{RigportError, RigportResult};
use crate::scene::material::MaterialStore;
use crate::scene::mesh::MeshStore;
use crate::scene::model::SceneGraph;
use serde::{Deserialize, Serialize};

/// A complete avatar scene: transform hierarchy plus the mesh and material
/// stores its nodes reference.
///
/// This is the unit the pipeline clones and transforms; the caller-owned
/// source instance is never mutated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarScene {
    /// Transform hierarchy.
    pub graph: SceneGraph,
    /// Mesh assets referenced by graph nodes.
    pub meshes: MeshStore,
    /// Materials referenced by meshes.
    pub materials: MaterialStore,
}

impl AvatarScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check structural invariants across the graph and both stores.
    ///
    /// This guards the crate boundary: a scene failing these checks was
    /// constructed incorrectly and is rejected before any stage runs.
    pub fn validate(&self) -> RigportResult<()> {
        self.graph.validate()?;

        for (idx, node) in self.graph.iter() {
            let Some(mesh_id) = node.mesh else {
                continue;
            };
            let Some(mesh) = self.meshes.get(mesh_id) else {
                return Err(RigportError::validation(format!(
                    "node {} (\"{}\") references out-of-range mesh {}",
                    idx.0, node.name, mesh_id.0
                )));
            };
            for &mat in &mesh.materials {
                if self.materials.get(mat).is_none() {
                    return Err(RigportError::validation(format!(
                        "mesh \"{}\" references out-of-range material {}",
                        mesh.name, mat.0
                    )));
                }
            }
            if let Some(skin) = &mesh.skin {
                if skin.bones.len() != skin.bindposes.len() {
                    return Err(RigportError::validation(format!(
                        "mesh \"{}\" skin has {} bones but {} bindposes",
                        mesh.name,
                        skin.bones.len(),
                        skin.bindposes.len()
                    )));
                }
                for &bone in &skin.bones {
                    if bone.0 as usize >= self.graph.len() {
                        return Err(RigportError::validation(format!(
                            "mesh \"{}\" skin references out-of-range bone {}",
                            mesh.name, bone.0
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/avatar.rs"]
mod tests;
