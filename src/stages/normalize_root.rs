use crate::foundation::math::{is_identity_rotation, is_single_axis_quarter_turn};
use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::bones::BoneRole;
use glam::Vec3;

/// Stage id of [`NormalizeRoot`].
pub const ID: &str = "normalize_root";

/// Tolerance, in degrees per axis, for the ±90° armature-rotation pattern.
const QUARTER_TURN_TOL_DEG: f32 = 0.5;

/// Tolerance, in degrees per axis, below which a rotation counts as
/// identity.
const IDENTITY_TOL_DEG: f32 = 0.01;

/// Normalize the scene root and the armature root.
///
/// The root's full local transform is reset to identity, and an armature
/// carrying the telltale ±90° single-axis rotation of a cross-toolchain
/// import has that rotation removed. Both changes are baked into the direct
/// children so every descendant keeps its world pose. Rotations below the
/// detection thresholds are left untouched and unreported.
pub struct NormalizeRoot;

impl Stage for NormalizeRoot {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Root normalization"
    }

    fn order(&self) -> u32 {
        20
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let graph = &mut ctx.avatar.graph;

        let Some(root) = graph.root() else {
            report.push(Notification::error(ID, "scene graph has no root node"));
            return report;
        };

        let local = graph.node(root).local;
        let non_identity = local.translation.length() > 1e-6
            || !is_identity_rotation(local.rotation, IDENTITY_TOL_DEG)
            || (local.scale - Vec3::ONE).length() > 1e-6;
        if non_identity {
            graph.bake_identity_to_children(root);
            report.push(Notification::info(
                ID,
                "root transform normalized to identity (world pose preserved)",
            ));
        }

        // Armature root: the node on the hips' ancestor chain sitting
        // directly under the scene root.
        if let Some(hips) = graph.find_role(BoneRole::Hips) {
            let mut armature = hips;
            while let Some(p) = graph.node(armature).parent {
                if p == root {
                    break;
                }
                armature = p;
            }
            if armature != root {
                let rotation = graph.node(armature).local.rotation;
                if is_single_axis_quarter_turn(rotation, QUARTER_TURN_TOL_DEG) {
                    graph.bake_rotation_to_children(armature);
                    report.push(Notification::warning(
                        ID,
                        format!(
                            "armature \"{}\" carried a ±90° single-axis rotation (coordinate-system mismatch); rotation baked into children",
                            graph.node(armature).name
                        ),
                    ));
                }
            }
        }

        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/normalize_root.rs"]
mod tests;
