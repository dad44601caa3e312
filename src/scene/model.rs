use crate::foundation::error::{RigportError, RigportResult};
use crate::foundation::ids::{MeshId, NodeIdx};
use crate::scene::bones::BoneRole;
use crate::scene::dynamics::{LooseComponent, SpringBone};
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Local translation/rotation/scale of a scene node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation relative to the parent node.
    pub translation: Vec3,
    /// Rotation relative to the parent node.
    pub rotation: Quat,
    /// Scale relative to the parent node.
    pub scale: Vec3,
}

impl Transform {
    /// No translation, identity rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Compose into a column-major affine matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A node in the hierarchical transform tree.
///
/// Nodes may carry an optional named bone role, a mesh attachment, a native
/// spring-bone component, and loosely-typed components from optional
/// third-party packages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    /// Author-chosen node name.
    pub name: String,
    /// Local transform relative to the parent.
    #[serde(default)]
    pub local: Transform,
    /// Parent node, `None` for the root.
    #[serde(default)]
    pub parent: Option<NodeIdx>,
    /// Direct children in declaration order.
    #[serde(default)]
    pub children: Vec<NodeIdx>,
    /// Skeletal role, when this node is a mapped humanoid bone.
    #[serde(default)]
    pub role: Option<BoneRole>,
    /// Attached mesh asset, if any.
    #[serde(default)]
    pub mesh: Option<MeshId>,
    /// Native spring-bone component, if any.
    #[serde(default)]
    pub spring: Option<SpringBone>,
    /// Components of optional third-party packages, readable only by name.
    #[serde(default)]
    pub components: Vec<LooseComponent>,
}

impl SceneNode {
    /// Create a bare node with an identity transform and no attachments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Transform::IDENTITY,
            parent: None,
            children: Vec::new(),
            role: None,
            mesh: None,
            spring: None,
            components: Vec::new(),
        }
    }
}

/// Arena-indexed transform hierarchy rooted at a single node.
///
/// Node identity is the arena index; the root is always index 0. World
/// transforms are derived top-down from local transforms, and world-pose
/// assignment recomputes the local transform against the parent's current
/// world transform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `node` as the root. Panics if the graph already has nodes.
    pub fn add_root(&mut self, mut node: SceneNode) -> NodeIdx {
        assert!(self.nodes.is_empty(), "graph already has a root");
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        NodeIdx(0)
    }

    /// Append `node` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeIdx, mut node: SceneNode) -> NodeIdx {
        let idx = NodeIdx(u32::try_from(self.nodes.len()).expect("node arena overflow"));
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0 as usize].children.push(idx);
        idx
    }

    /// Root node index, `None` for an empty graph.
    pub fn root(&self) -> Option<NodeIdx> {
        if self.nodes.is_empty() {
            None
        } else {
            Some(NodeIdx(0))
        }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    pub fn node(&self, idx: NodeIdx) -> &SceneNode {
        &self.nodes[idx.0 as usize]
    }

    /// Mutably borrow a node.
    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut SceneNode {
        &mut self.nodes[idx.0 as usize]
    }

    /// Iterate `(index, node)` pairs in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeIdx(i as u32), n))
    }

    /// First node carrying `role`, if any.
    pub fn find_role(&self, role: BoneRole) -> Option<NodeIdx> {
        self.iter()
            .find(|(_, n)| n.role == Some(role))
            .map(|(i, _)| i)
    }

    /// Collect `root` and all of its descendants in pre-order.
    pub fn descendants(&self, root: NodeIdx) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        self.collect_preorder(root, &mut out);
        out
    }

    fn collect_preorder(&self, idx: NodeIdx, out: &mut Vec<NodeIdx>) {
        out.push(idx);
        for &c in &self.nodes[idx.0 as usize].children {
            self.collect_preorder(c, out);
        }
    }

    /// World (root-space) affine matrix of `idx`.
    pub fn world_matrix(&self, idx: NodeIdx) -> Mat4 {
        let node = &self.nodes[idx.0 as usize];
        match node.parent {
            Some(p) => self.world_matrix(p) * node.local.matrix(),
            None => node.local.matrix(),
        }
    }

    /// World rotation of `idx`, composed along the parent chain.
    ///
    /// Follows the host-engine convention: rotation composition ignores the
    /// shear a non-uniform parent scale would introduce.
    pub fn world_rotation(&self, idx: NodeIdx) -> Quat {
        let node = &self.nodes[idx.0 as usize];
        match node.parent {
            Some(p) => (self.world_rotation(p) * node.local.rotation).normalize(),
            None => node.local.rotation,
        }
    }

    /// World position of `idx`.
    pub fn world_position(&self, idx: NodeIdx) -> Vec3 {
        let node = &self.nodes[idx.0 as usize];
        match node.parent {
            Some(p) => self.world_matrix(p).transform_point3(node.local.translation),
            None => node.local.translation,
        }
    }

    /// Assign a world rotation by recomputing the local rotation against the
    /// parent's current world rotation.
    pub fn set_world_rotation(&mut self, idx: NodeIdx, rotation: Quat) {
        let local = match self.nodes[idx.0 as usize].parent {
            Some(p) => (self.world_rotation(p).inverse() * rotation).normalize(),
            None => rotation,
        };
        self.nodes[idx.0 as usize].local.rotation = local;
    }

    /// Assign a world position by recomputing the local translation against
    /// the parent's current world transform.
    pub fn set_world_position(&mut self, idx: NodeIdx, position: Vec3) {
        let local = match self.nodes[idx.0 as usize].parent {
            Some(p) => self.world_matrix(p).inverse().transform_point3(position),
            None => position,
        };
        self.nodes[idx.0 as usize].local.translation = local;
    }

    /// Bake the local rotation of `idx` into its children.
    ///
    /// Every direct child keeps its world position and world rotation; the
    /// node's own local rotation becomes identity. A node with no children
    /// only has its rotation reset.
    pub fn bake_rotation_to_children(&mut self, idx: NodeIdx) {
        self.bake_to_children(idx, |node| {
            node.local.rotation = Quat::IDENTITY;
        });
    }

    /// Reset the full local transform of `idx` to identity, baking the
    /// change into its children so their world poses are preserved.
    pub fn bake_identity_to_children(&mut self, idx: NodeIdx) {
        self.bake_to_children(idx, |node| {
            node.local = Transform::IDENTITY;
        });
    }

    fn bake_to_children(&mut self, idx: NodeIdx, reset: impl FnOnce(&mut SceneNode)) {
        let children = self.nodes[idx.0 as usize].children.clone();
        let snapshot: SmallVec<[(NodeIdx, Vec3, Quat); 8]> = children
            .iter()
            .map(|&c| (c, self.world_position(c), self.world_rotation(c)))
            .collect();

        reset(&mut self.nodes[idx.0 as usize]);

        for (c, position, rotation) in snapshot {
            self.set_world_rotation(c, rotation);
            self.set_world_position(c, position);
        }
    }

    /// Check structural invariants: a single root at index 0, parent/child
    /// agreement, and an acyclic parent chain.
    pub fn validate(&self) -> RigportResult<()> {
        if self.nodes.is_empty() {
            return Err(RigportError::validation("scene graph has no nodes"));
        }
        if self.nodes[0].parent.is_some() {
            return Err(RigportError::validation("node 0 must be the parentless root"));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if i != 0 && node.parent.is_none() {
                return Err(RigportError::validation(format!(
                    "node {i} (\"{}\") is an orphan (no parent, not the root)",
                    node.name
                )));
            }
            if let Some(p) = node.parent {
                let Some(parent) = self.nodes.get(p.0 as usize) else {
                    return Err(RigportError::validation(format!(
                        "node {i} (\"{}\") has out-of-range parent {}",
                        node.name, p.0
                    )));
                };
                if !parent.children.contains(&NodeIdx(i as u32)) {
                    return Err(RigportError::validation(format!(
                        "node {i} (\"{}\") is missing from its parent's child list",
                        node.name
                    )));
                }
            }
            for &c in &node.children {
                match self.nodes.get(c.0 as usize) {
                    Some(child) if child.parent == Some(NodeIdx(i as u32)) => {}
                    _ => {
                        return Err(RigportError::validation(format!(
                            "node {i} (\"{}\") has inconsistent child {}",
                            node.name, c.0
                        )));
                    }
                }
            }
            // Cycle check: the parent chain must terminate within arena size.
            let mut cursor = node.parent;
            let mut steps = 0usize;
            while let Some(p) = cursor {
                steps += 1;
                if steps > self.nodes.len() {
                    return Err(RigportError::validation(format!(
                        "node {i} (\"{}\") sits on a parent cycle",
                        node.name
                    )));
                }
                cursor = self.nodes.get(p.0 as usize).and_then(|n| n.parent);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
