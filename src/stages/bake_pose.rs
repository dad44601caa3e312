use crate::foundation::ids::{MeshId, NodeIdx};
use crate::foundation::math::exceeds_per_axis_deg;
use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::bones::{BoneRole, BoneTable};
use std::collections::HashSet;

/// Stage id of [`BakePose`].
pub const ID: &str = "bake_pose";

/// Per-axis rest-rotation threshold, in degrees, above which a limb bone is
/// baked.
const LIMB_BAKE_THRESHOLD_DEG: f32 = 5.0;

/// Remove awkward rest rotations from mapped limb bones.
///
/// A limb bone rotated more than 5° on any axis has that rotation baked into
/// its children: every child keeps its world pose while the bone's local
/// rotation becomes identity. Because a baked bone's own world orientation
/// changes, the bindposes of every skinned mesh bound to it are recomputed
/// on a duplicated mesh asset, so originals shared with other scenes are
/// never touched. Skipping that recompute corrupts skinning silently, which
/// is why it runs in the same stage as the bake.
pub struct BakePose;

impl Stage for BakePose {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Rest-pose baking"
    }

    fn order(&self) -> u32 {
        30
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();

        // Tolerate a disabled humanoid validation: resolve locally, first
        // mapping wins.
        let table = match &ctx.exchange.bone_table {
            Some(t) => t.clone(),
            None => BoneTable::resolve(&ctx.avatar.graph).0,
        };

        if table.get(BoneRole::Hips).is_none() {
            report.push(Notification::error(
                ID,
                "no valid skeleton: the hips bone is unmapped",
            ));
            return report;
        }

        let limbs: Vec<(BoneRole, NodeIdx)> =
            table.iter().filter(|(role, _)| role.is_limb()).collect();
        if limbs.is_empty() {
            report.push(Notification::warning(
                ID,
                "no limb bones mapped; rest-pose baking skipped",
            ));
            return report;
        }

        let graph = &mut ctx.avatar.graph;
        let mut baked: Vec<(BoneRole, NodeIdx)> = Vec::new();
        for (role, idx) in limbs {
            let rotation = graph.node(idx).local.rotation;
            if exceeds_per_axis_deg(rotation, LIMB_BAKE_THRESHOLD_DEG) {
                graph.bake_rotation_to_children(idx);
                baked.push((role, idx));
            }
        }

        if baked.is_empty() {
            return report;
        }

        let names: Vec<String> = baked
            .iter()
            .map(|(role, idx)| format!("{role:?} (\"{}\")", graph.node(*idx).name))
            .collect();
        report.push(
            Notification::warning(
                ID,
                format!(
                    "baked rest rotation of {} limb bones exceeding {LIMB_BAKE_THRESHOLD_DEG}° per axis",
                    baked.len()
                ),
            )
            .with_details(names.join(", ")),
        );

        // Bindpose recompute for every skinned mesh bound to a baked bone.
        let baked_set: HashSet<NodeIdx> = baked.iter().map(|(_, idx)| *idx).collect();
        let mut rebinds: Vec<(NodeIdx, MeshId)> = Vec::new();
        for (idx, node) in ctx.avatar.graph.iter() {
            let Some(mesh_id) = node.mesh else {
                continue;
            };
            let Some(mesh) = ctx.avatar.meshes.get(mesh_id) else {
                continue;
            };
            let Some(skin) = &mesh.skin else {
                continue;
            };
            if skin.bones.iter().any(|b| baked_set.contains(b)) {
                rebinds.push((idx, mesh_id));
            }
        }

        for (node_idx, mesh_id) in rebinds {
            let Some(new_id) = ctx.avatar.meshes.duplicate(mesh_id) else {
                continue;
            };
            let skin_world = ctx.avatar.graph.world_matrix(node_idx);
            let mesh = ctx
                .avatar
                .meshes
                .get_mut(new_id)
                .expect("freshly duplicated mesh");
            let name = mesh.name.clone();
            if let Some(skin) = &mut mesh.skin {
                let bones = skin.bones.clone();
                skin.bindposes = bones
                    .iter()
                    .map(|&b| ctx.avatar.graph.world_matrix(b).inverse() * skin_world)
                    .collect();
            }
            ctx.avatar.graph.node_mut(node_idx).mesh = Some(new_id);
            report.push(Notification::info(
                ID,
                format!("recomputed bindposes of mesh \"{name}\" on a duplicated asset"),
            ));
        }

        ctx.exchange.baked_bones = baked.into_iter().map(|(_, idx)| idx).collect();
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/bake_pose.rs"]
mod tests;
