use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::bones::{BoneRole, BoneTable};

/// Stage id of [`ValidateHumanoid`].
pub const ID: &str = "validate_humanoid";

/// Resolve the humanoid bone-role table and enforce the rig invariants:
/// every required bone present, no role mapped twice.
///
/// The resolved table is published on the exchange for downstream stages.
pub struct ValidateHumanoid;

impl Stage for ValidateHumanoid {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Humanoid validation"
    }

    fn order(&self) -> u32 {
        10
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let graph = &ctx.avatar.graph;

        let (table, duplicates) = BoneTable::resolve(graph);

        for (role, kept, ignored) in duplicates {
            report.push(Notification::error(
                ID,
                format!(
                    "duplicate bone role {role:?}: mapped on both \"{}\" and \"{}\"",
                    graph.node(kept).name,
                    graph.node(ignored).name
                ),
            ));
        }

        for role in BoneRole::REQUIRED {
            if table.get(role).is_none() {
                report.push(Notification::error(ID, format!("missing required bone: {role:?}")));
            }
        }

        let missing_optional: Vec<String> = BoneRole::ALL
            .into_iter()
            .filter(|r| !r.is_required() && table.get(*r).is_none())
            .map(|r| format!("{r:?}"))
            .collect();
        if !missing_optional.is_empty() {
            report.push(
                Notification::info(
                    ID,
                    format!("{} optional bones are unmapped", missing_optional.len()),
                )
                .with_details(missing_optional.join(", ")),
            );
        }

        if report.success() {
            ctx.exchange.bone_table = Some(table);
        }

        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/validate_humanoid.rs"]
mod tests;
