use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::bones::BoneRole;

/// Stage id of [`ValidateRoot`].
pub const ID: &str = "validate_root";

/// Structural entry check: the clone must have a root node and a skeleton
/// anchored at a mapped hips bone. Also records the scene statistics header.
pub struct ValidateRoot;

impl Stage for ValidateRoot {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Root validation"
    }

    fn order(&self) -> u32 {
        0
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let graph = &ctx.avatar.graph;

        if graph.is_empty() {
            report.push(Notification::error(ID, "scene graph has no root node"));
            return report;
        }

        report.push(Notification::info(
            ID,
            format!(
                "scene: {} nodes, {} meshes, {} materials",
                graph.len(),
                ctx.avatar.meshes.len(),
                ctx.avatar.materials.len()
            ),
        ));

        if graph.find_role(BoneRole::Hips).is_none() {
            report.push(Notification::error(
                ID,
                "no skeleton root found: the hips bone is unmapped",
            ));
        }

        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/validate_root.rs"]
mod tests;
