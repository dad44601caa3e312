use crate::foundation::ids::MeshId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Canonical expression identifiers of the interchange format.
///
/// Covers the emotion presets, the five lip-sync visemes, blink variants,
/// and the four gaze directions.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionPreset {
    /// Rest face.
    Neutral,
    /// Joy / smile.
    Happy,
    /// Anger.
    Angry,
    /// Sadness.
    Sorrow,
    /// Relaxed / fun.
    Relaxed,
    /// Surprise.
    Surprised,
    /// Viseme "aa".
    Aa,
    /// Viseme "ih".
    Ih,
    /// Viseme "ou".
    Ou,
    /// Viseme "ee".
    Ee,
    /// Viseme "oh".
    Oh,
    /// Both eyes closed.
    Blink,
    /// Left eye closed.
    BlinkLeft,
    /// Right eye closed.
    BlinkRight,
    /// Gaze up.
    LookUp,
    /// Gaze down.
    LookDown,
    /// Gaze left.
    LookLeft,
    /// Gaze right.
    LookRight,
}

impl ExpressionPreset {
    /// True for the gaze presets, which only exist in the current schema
    /// variant.
    pub fn is_gaze(self) -> bool {
        matches!(
            self,
            ExpressionPreset::LookUp
                | ExpressionPreset::LookDown
                | ExpressionPreset::LookLeft
                | ExpressionPreset::LookRight
        )
    }
}

/// A morph target resolved for one canonical expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphBinding {
    /// Mesh carrying the morph target.
    pub mesh: MeshId,
    /// Morph index on that mesh.
    pub index: u32,
    /// Author-chosen morph name (for diagnostics).
    pub name: String,
}

/// Mapping from canonical expression identifiers to resolved morph targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpressionMap {
    entries: BTreeMap<ExpressionPreset, MorphBinding>,
}

impl ExpressionMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding for `preset`, if mapped.
    pub fn get(&self, preset: ExpressionPreset) -> Option<&MorphBinding> {
        self.entries.get(&preset)
    }

    /// True when `preset` is mapped.
    pub fn contains(&self, preset: ExpressionPreset) -> bool {
        self.entries.contains_key(&preset)
    }

    /// Map `preset` to `binding`. Returns `false` (and leaves the existing
    /// binding in place) when the preset is already mapped.
    pub fn insert(&mut self, preset: ExpressionPreset, binding: MorphBinding) -> bool {
        if self.entries.contains_key(&preset) {
            return false;
        }
        self.entries.insert(preset, binding);
        true
    }

    /// Number of mapped presets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(preset, binding)` pairs in preset order.
    pub fn iter(&self) -> impl Iterator<Item = (ExpressionPreset, &MorphBinding)> {
        self.entries.iter().map(|(&p, b)| (p, b))
    }
}
