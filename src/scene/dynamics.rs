use crate::foundation::ids::NodeIdx;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Native spring-bone component in the target format's own physics model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringBone {
    /// Restoring force toward the rest pose, `0..=4`.
    pub stiffness: f32,
    /// Gravity magnitude applied to the chain.
    pub gravity_power: f32,
    /// Gravity direction (unit vector).
    pub gravity_dir: Vec3,
    /// Velocity damping, `0..=1`.
    pub drag_force: f32,
    /// Collision radius of each joint.
    pub hit_radius: f32,
}

impl Default for SpringBone {
    fn default() -> Self {
        Self {
            stiffness: 1.0,
            gravity_power: 0.0,
            gravity_dir: Vec3::NEG_Y,
            drag_force: 0.4,
            hit_radius: 0.02,
        }
    }
}

/// Loosely-typed field value read from a third-party component by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// Scalar value.
    Float(f32),
    /// Three-component vector.
    Vec3(Vec3),
    /// Boolean flag.
    Bool(bool),
    /// String value.
    Str(String),
    /// Reference to a scene node.
    Node(NodeIdx),
}

/// Component instance of an optional external package.
///
/// The backing type may or may not exist in the host environment, so the
/// component is addressed by fully-qualified type name and its fields are
/// read by name rather than through compile-time bindings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LooseComponent {
    /// Fully-qualified type name of the backing component.
    pub type_name: String,
    /// Named field values in key order.
    pub fields: BTreeMap<String, FieldValue>,
}

impl LooseComponent {
    /// Create a component of the given fully-qualified type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Raw field value, if present.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// Normalized secondary-motion parameters for one bone chain, handed to the
/// external exporter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpringBoneGroup {
    /// Human-readable label of the source component schema.
    pub source: String,
    /// Restoring force toward the rest pose, `0..=4`.
    pub stiffness: f32,
    /// Gravity magnitude.
    pub gravity_power: f32,
    /// Gravity direction (unit vector).
    pub gravity_dir: Vec3,
    /// Velocity damping, `0..=1`.
    pub drag_force: f32,
    /// Collision radius of each joint.
    pub hit_radius: f32,
    /// Affected bone chain: root bone plus all descendants, pre-order.
    pub bones: Vec<NodeIdx>,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/dynamics.rs"]
mod tests;
