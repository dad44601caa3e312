use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{PipelineReport, StageRun};
use crate::pipeline::stage::Stage;

struct StageEntry {
    stage: Box<dyn Stage>,
    enabled: bool,
    seq: usize,
}

/// Ordered, filterable collection of stages executed fail-fast.
///
/// Stages run in ascending [`Stage::order`], ties broken by insertion order
/// so execution is deterministic. Disabled stages never execute. The first
/// stage whose report cannot continue halts the run immediately; its id is
/// recorded on the pipeline report.
#[derive(Default)]
pub struct Pipeline {
    entries: Vec<StageEntry>,
    next_seq: usize,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with the standard conversion stages in canonical order.
    pub fn standard() -> Self {
        use crate::stages;

        let mut p = Self::new();
        p.add_stage(Box::new(stages::validate_root::ValidateRoot));
        p.add_stage(Box::new(stages::validate_humanoid::ValidateHumanoid));
        p.add_stage(Box::new(stages::normalize_root::NormalizeRoot));
        p.add_stage(Box::new(stages::bake_pose::BakePose));
        p.add_stage(Box::new(stages::remap_materials::RemapMaterials));
        p.add_stage(Box::new(stages::clamp_materials::ClampMaterials));
        p.add_stage(Box::new(stages::map_expressions::MapExpressions));
        p.add_stage(Box::new(stages::map_dynamics::MapDynamics));
        p
    }

    /// Append a stage (enabled).
    pub fn add_stage(&mut self, stage: Box<dyn Stage>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(StageEntry {
            stage,
            enabled: true,
            seq,
        });
    }

    /// Remove the stage with `id`. Returns `false` when no stage matched.
    pub fn remove_stage(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.stage.id() != id);
        self.entries.len() != before
    }

    /// Enable or disable the stage with `id`. Returns `false` when no stage
    /// matched.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        let mut found = false;
        for e in &mut self.entries {
            if e.stage.id() == id {
                e.enabled = enabled;
                found = true;
            }
        }
        found
    }

    /// Ids of all stages (enabled or not) in insertion order.
    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.stage.id()).collect()
    }

    /// Execute all enabled stages against `ctx`.
    ///
    /// Each stage's notifications are merged into the context log as the
    /// stage completes, so `ctx.notifications()` always reflects the run so
    /// far.
    #[tracing::instrument(skip_all)]
    pub fn execute(&self, ctx: &mut ExportContext<'_>) -> PipelineReport {
        let mut order: Vec<&StageEntry> = self.entries.iter().filter(|e| e.enabled).collect();
        order.sort_by_key(|e| (e.stage.order(), e.seq));

        let mut report = PipelineReport::default();
        for entry in order {
            let id = entry.stage.id();
            tracing::debug!(stage = id, "executing stage");
            let stage_report = entry.stage.execute(ctx);
            ctx.absorb(&stage_report);

            let can_continue = stage_report.can_continue();
            report.stages.push(StageRun {
                id: id.to_owned(),
                report: stage_report,
            });
            if !can_continue {
                tracing::debug!(stage = id, "stage halted the pipeline");
                report.halted_at = Some(id.to_owned());
                break;
            }
        }

        report.notifications = ctx.notifications().to_vec();
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/runner.rs"]
mod tests;
