//! Scene-graph data model consumed and mutated by the conversion pipeline.

/// The avatar bundle: graph plus mesh and material stores.
pub mod avatar;
/// Humanoid bone-role vocabulary and the resolved role table.
pub mod bones;
/// Secondary-motion components: native spring bones and loosely-typed
/// third-party component bags.
pub mod dynamics;
/// Canonical expression identifiers and the resolved expression map.
pub mod expressions;
/// Guarded-property-bag materials.
pub mod material;
/// Mesh assets, morph targets, and skin bindings.
pub mod mesh;
/// The arena-indexed transform hierarchy.
pub mod model;
