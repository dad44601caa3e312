use crate::foundation::ids::{MaterialId, MeshId};
use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::material::{Material, Rgba};

/// Stage id of [`RemapMaterials`].
pub const ID: &str = "remap_materials";

/// Shading model identifier of converted materials.
pub const DEST_SHADER: &str = "Toon";

/// Factor applied to the base color when synthesizing a shade color for
/// sources without an explicit shadow pass.
const SHADE_FACTOR: f32 = 0.7;

#[derive(Clone, Copy)]
enum SlotKind {
    Color,
    Float,
    Texture,
}

struct PropertyRule {
    kind: SlotKind,
    source: &'static str,
    dest: &'static str,
}

const fn rule(kind: SlotKind, source: &'static str, dest: &'static str) -> PropertyRule {
    PropertyRule { kind, source, dest }
}

/// Source -> destination property table, grouped by semantic slot.
const RULES: &[PropertyRule] = &[
    // Base color and texture.
    rule(SlotKind::Color, "_Color", "_Color"),
    rule(SlotKind::Texture, "_MainTex", "_MainTex"),
    // Normal map.
    rule(SlotKind::Texture, "_BumpMap", "_BumpMap"),
    rule(SlotKind::Float, "_BumpScale", "_BumpScale"),
    // Shadow color (explicit shadow pass).
    rule(SlotKind::Color, "_ShadowColor", "_ShadeColor"),
    rule(SlotKind::Texture, "_ShadowTex", "_ShadeTexture"),
    // Rim light.
    rule(SlotKind::Color, "_RimColor", "_RimColor"),
    rule(SlotKind::Float, "_RimPower", "_RimFresnelPower"),
    // Emission.
    rule(SlotKind::Color, "_EmissionColor", "_EmissionColor"),
    rule(SlotKind::Texture, "_EmissionMap", "_EmissionMap"),
    // Outline color (width is handled by a different mechanism downstream).
    rule(SlotKind::Color, "_OutlineColor", "_OutlineColor"),
    // Alpha cutoff.
    rule(SlotKind::Float, "_Cutoff", "_Cutoff"),
    // Culling.
    rule(SlotKind::Float, "_Cull", "_CullMode"),
];

/// Translate every material onto the target toon shading model.
///
/// Conversion is best-effort: each property read is independently guarded,
/// so a source missing half its slots still converts the other half. The
/// destination material is always a new store entry; sources are left
/// untouched and meshes are repointed. Materials needing special downstream
/// handling (transparent or emissive) are recorded on the exchange.
pub struct RemapMaterials;

impl Stage for RemapMaterials {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Material remap"
    }

    fn order(&self) -> u32 {
        40
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let mut special: Vec<MaterialId> = Vec::new();
        let mut converted = 0usize;

        let source_count = ctx.avatar.materials.len();
        for raw in 0..source_count {
            let src_id = MaterialId(raw as u32);
            let src = ctx
                .avatar
                .materials
                .get(src_id)
                .expect("material index in range")
                .clone();
            if src.shader == DEST_SHADER {
                continue;
            }

            let mut dst = Material::new(src.name.clone(), DEST_SHADER);
            for rule in RULES {
                match rule.kind {
                    SlotKind::Color => {
                        if let Some(v) = src.color(rule.source) {
                            dst.set_color(rule.dest, v);
                        }
                    }
                    SlotKind::Float => {
                        if let Some(v) = src.float(rule.source) {
                            dst.set_float(rule.dest, v);
                        }
                    }
                    SlotKind::Texture => {
                        if let Some(v) = src.texture(rule.source) {
                            dst.set_texture(rule.dest, v.clone());
                        }
                    }
                }
            }

            // No explicit shadow pass: synthesize the shade color from the
            // base color, alpha forced opaque.
            if !src.has_color("_ShadowColor") {
                let base = src.color("_Color").unwrap_or(Rgba::WHITE);
                let mut shade = base.scaled_rgb(SHADE_FACTOR);
                shade.a = 1.0;
                dst.set_color("_ShadeColor", shade);
            }

            // Alpha mode: opaque / cutout / transparent.
            let mut transparent = false;
            if let Some(mode) = src.float("_Mode") {
                let blend = if mode <= 0.5 {
                    0.0
                } else if mode <= 1.5 {
                    1.0
                } else {
                    transparent = true;
                    2.0
                };
                dst.set_float("_BlendMode", blend);
                // Cutout needs a threshold; sources without an authored
                // cutoff get the conventional default.
                if blend == 1.0 && !src.has_float("_Cutoff") {
                    dst.set_float("_Cutoff", 0.5);
                }
            }

            let outlined = src.float("_OutlineWidth").map(|w| w > 0.0).unwrap_or(false)
                || src.shader.to_ascii_lowercase().contains("outline");
            if outlined {
                report.push(Notification::warning(
                    ID,
                    format!(
                        "material \"{}\" uses outlines; the target model drives outlines through a separate pass and the source settings were not carried over",
                        src.name
                    ),
                ));
            }

            let emissive = src.has_texture("_EmissionMap")
                || src
                    .color("_EmissionColor")
                    .map(|c| c.r > 0.0 || c.g > 0.0 || c.b > 0.0)
                    .unwrap_or(false);

            let dst_id = ctx.avatar.materials.add(dst);
            if transparent || emissive {
                special.push(dst_id);
            }

            for raw_mesh in 0..ctx.avatar.meshes.len() {
                if let Some(mesh) = ctx.avatar.meshes.get_mut(MeshId(raw_mesh as u32)) {
                    for slot in &mut mesh.materials {
                        if *slot == src_id {
                            *slot = dst_id;
                        }
                    }
                }
            }
            converted += 1;
        }

        if converted > 0 {
            report.push(Notification::info(
                ID,
                format!("converted {converted} materials to the {DEST_SHADER} shading model"),
            ));
        } else {
            report.push(Notification::info(ID, "no materials required conversion"));
        }

        ctx.exchange.special_materials = special;
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/remap_materials.rs"]
mod tests;
