use crate::foundation::ids::{MaterialId, NodeIdx};
use crate::pipeline::notify::{Notification, Severity, StageReport};
use crate::scene::avatar::AvatarScene;
use crate::scene::bones::BoneTable;
use crate::scene::dynamics::SpringBoneGroup;
use crate::scene::expressions::ExpressionMap;
use serde::{Deserialize, Serialize};

/// Output schema variant selected by the caller.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetVersion {
    /// The legacy schema variant (version flag 0).
    Legacy,
    /// The current schema variant (version flag 1).
    Current,
}

impl TargetVersion {
    /// True for [`TargetVersion::Current`].
    pub fn is_current(self) -> bool {
        self == TargetVersion::Current
    }
}

/// Typed stage-to-stage handoff carried by the context.
///
/// Every field has a meaningful default: stages may be individually
/// disabled, so each consumer must tolerate absent upstream data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageExchange {
    /// Resolved bone-role table (written by humanoid validation).
    pub bone_table: Option<BoneTable>,
    /// Bones whose rest rotation was baked into descendants.
    pub baked_bones: Vec<NodeIdx>,
    /// Materials needing special downstream handling (transparent or
    /// emissive), detected during the remap.
    pub special_materials: Vec<MaterialId>,
    /// Canonical expression mapping (written by the expression matcher).
    pub expressions: Option<ExpressionMap>,
    /// Normalized secondary-motion chains (written by the dynamics mapper).
    pub spring_groups: Vec<SpringBoneGroup>,
}

/// Shared mutable working state threaded through every pipeline stage.
///
/// Created once per conversion attempt around a read-only source scene; the
/// working clone is owned by the context and mutated in place by stages. The
/// context lives exactly as long as the run and is torn down by
/// [`ExportContext::finish`].
#[derive(Debug)]
pub struct ExportContext<'a> {
    source: &'a AvatarScene,
    /// Working clone of the source scene, mutated in place by stages.
    pub avatar: AvatarScene,
    /// Output schema variant downstream rules apply.
    pub version: TargetVersion,
    /// Typed stage-to-stage handoff.
    pub exchange: StageExchange,
    notifications: Vec<Notification>,
}

impl<'a> ExportContext<'a> {
    /// Create a context around `source`, cloning it into the working scene.
    pub fn new(source: &'a AvatarScene, version: TargetVersion) -> Self {
        Self {
            source,
            avatar: source.clone(),
            version,
            exchange: StageExchange::default(),
            notifications: Vec::new(),
        }
    }

    /// The untouched source scene. Stages must never mutate it; the borrow
    /// makes that structural.
    pub fn source(&self) -> &AvatarScene {
        self.source
    }

    /// Every notification recorded so far, in emission order. The log is
    /// append-only and never reordered or pruned.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// True once any [`Severity::Error`] record has been absorbed; never
    /// reset within a run.
    pub fn has_error(&self) -> bool {
        self.notifications
            .iter()
            .any(|n| n.severity == Severity::Error)
    }

    /// Merge a stage report into the run-wide log.
    pub(crate) fn absorb(&mut self, report: &StageReport) {
        self.notifications
            .extend(report.notifications.iter().cloned());
    }

    /// Tear down the context, releasing the transformed scene, the
    /// exchange, and the full notification log.
    pub fn finish(self) -> (AvatarScene, StageExchange, Vec<Notification>) {
        (self.avatar, self.exchange, self.notifications)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/context.rs"]
mod tests;
