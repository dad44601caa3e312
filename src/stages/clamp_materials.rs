use crate::foundation::ids::MaterialId;
use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::material::Rgba;

/// Stage id of [`ClampMaterials`].
pub const ID: &str = "clamp_materials";

/// Color properties that must lie in `[0,1]` per component.
const COLOR_PROPERTIES: &[&str] = &[
    "_Color",
    "_ShadeColor",
    "_EmissionColor",
    "_RimColor",
    "_OutlineColor",
];

/// Scalar properties that must lie in `[0,1]`.
const UNIT_FLOAT_PROPERTIES: &[&str] = &[
    "_Cutoff",
    "_ShadeToony",
    "_ShadeShift",
    "_RimLightingMix",
];

/// Force every scanned material property into the normalized `[0,1]` range.
///
/// Artist-authored data is never modified silently: every clamp emits a
/// Warning naming the property, the original value, and the clamped value.
/// A scan that clamps nothing reports that explicitly, so an empty warning
/// list is distinguishable from a skipped scan. Running the pass twice is
/// idempotent; the second scan finds everything already in range.
pub struct ClampMaterials;

fn clamp01(v: f32) -> f32 {
    if !v.is_finite() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

fn clamp01_rgba(c: Rgba) -> Rgba {
    Rgba {
        r: clamp01(c.r),
        g: clamp01(c.g),
        b: clamp01(c.b),
        a: clamp01(c.a),
    }
}

impl Stage for ClampMaterials {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Material value clamp"
    }

    fn order(&self) -> u32 {
        50
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let mut clamped = 0usize;

        for raw in 0..ctx.avatar.materials.len() {
            let id = MaterialId(raw as u32);

            let mut color_edits: Vec<(&'static str, Rgba, Rgba)> = Vec::new();
            let mut float_edits: Vec<(&'static str, f32, f32)> = Vec::new();
            let name;
            {
                let material = ctx
                    .avatar
                    .materials
                    .get(id)
                    .expect("material index in range");
                name = material.name.clone();
                for &key in COLOR_PROPERTIES {
                    if let Some(value) = material.color(key) {
                        let bounded = clamp01_rgba(value);
                        if bounded != value {
                            color_edits.push((key, value, bounded));
                        }
                    }
                }
                for &key in UNIT_FLOAT_PROPERTIES {
                    if let Some(value) = material.float(key) {
                        let bounded = clamp01(value);
                        if bounded != value {
                            float_edits.push((key, value, bounded));
                        }
                    }
                }
            }

            if color_edits.is_empty() && float_edits.is_empty() {
                continue;
            }

            let material = ctx
                .avatar
                .materials
                .get_mut(id)
                .expect("material index in range");
            for (key, original, bounded) in color_edits {
                material.set_color(key, bounded);
                report.push(Notification::warning(
                    ID,
                    format!("{key} on \"{name}\" clamped from {original} to {bounded}"),
                ));
                clamped += 1;
            }
            for (key, original, bounded) in float_edits {
                material.set_float(key, bounded);
                report.push(Notification::warning(
                    ID,
                    format!("{key} on \"{name}\" clamped from {original} to {bounded}"),
                ));
                clamped += 1;
            }
        }

        if clamped == 0 {
            report.push(Notification::info(ID, "no clamp required"));
        }

        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/clamp_materials.rs"]
mod tests;
