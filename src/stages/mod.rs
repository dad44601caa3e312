//! The standard conversion stages in canonical order.
//!
//! Each stage is an independent unit: it reads and mutates the cloned scene
//! and the typed exchange, and reports everything it did through
//! notifications. Stage order values are spaced so host applications can
//! interleave custom stages.

/// Rest-pose rotation baking and bindpose recomputation.
pub mod bake_pose;
/// Mandatory-disclosure value clamping.
pub mod clamp_materials;
/// Secondary-motion cross-schema mapping.
pub mod map_dynamics;
/// Blendshape-to-expression matching.
pub mod map_expressions;
/// Root and armature normalization.
pub mod normalize_root;
/// Shader-property remapping onto the toon model.
pub mod remap_materials;
/// Humanoid bone-role validation.
pub mod validate_humanoid;
/// Structural root validation.
pub mod validate_root;
