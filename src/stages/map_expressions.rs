use crate::pipeline::context::ExportContext;
use crate::pipeline::notify::{Notification, StageReport};
use crate::pipeline::stage::Stage;
use crate::scene::expressions::{ExpressionMap, ExpressionPreset, MorphBinding};

/// Stage id of [`MapExpressions`].
pub const ID: &str = "map_expressions";

/// Maximum number of unmapped morph names listed inline.
const UNMAPPED_LIST_CAP: usize = 10;

/// Alias patterns per canonical expression, in matching order.
///
/// A morph maps to the first canonical identifier whose alias list matches
/// its lowercased name (exact or substring). Matching order is the declared
/// order of this table, not the enum order: the one-eyed blink and wink
/// variants sit before the generic blink so "blink_l" does not fall into the
/// two-eyed slot.
const ALIASES: &[(ExpressionPreset, &[&str])] = &[
    (ExpressionPreset::Neutral, &["neutral"]),
    (ExpressionPreset::Happy, &["joy", "happy", "smile", "笑い", "笑顔"]),
    (ExpressionPreset::Angry, &["angry", "anger", "怒り"]),
    (ExpressionPreset::Sorrow, &["sorrow", "sad", "悲しみ", "哀"]),
    (ExpressionPreset::Relaxed, &["fun", "relaxed", "楽しみ"]),
    (ExpressionPreset::Surprised, &["surprised", "surprise", "驚き", "びっくり"]),
    (ExpressionPreset::Aa, &["v_aa", "mouth_a", "aa", "あ"]),
    (ExpressionPreset::Ih, &["v_ih", "mouth_i", "ih", "い"]),
    (ExpressionPreset::Ou, &["v_ou", "mouth_u", "ou", "う"]),
    (ExpressionPreset::Ee, &["v_e", "mouth_e", "ee", "え"]),
    (ExpressionPreset::Oh, &["v_oh", "mouth_o", "oh", "お"]),
    (ExpressionPreset::BlinkLeft, &["blink_l", "wink_l", "ウィンク"]),
    (ExpressionPreset::BlinkRight, &["blink_r", "wink_r", "ウィンク右"]),
    (ExpressionPreset::Blink, &["blink", "まばたき", "eyes_closed"]),
    (ExpressionPreset::LookUp, &["look_up", "lookup", "上を向く"]),
    (ExpressionPreset::LookDown, &["look_down", "lookdown", "下を向く"]),
    (ExpressionPreset::LookLeft, &["look_left", "lookleft", "左を向く"]),
    (ExpressionPreset::LookRight, &["look_right", "lookright", "右を向く"]),
];

/// Expressions a complete avatar is expected to carry: the core emotions,
/// the five visemes, and the two-eyed blink.
const RECOMMENDED: &[ExpressionPreset] = &[
    ExpressionPreset::Happy,
    ExpressionPreset::Angry,
    ExpressionPreset::Sorrow,
    ExpressionPreset::Relaxed,
    ExpressionPreset::Surprised,
    ExpressionPreset::Aa,
    ExpressionPreset::Ih,
    ExpressionPreset::Ou,
    ExpressionPreset::Ee,
    ExpressionPreset::Oh,
    ExpressionPreset::Blink,
];

/// Map free-form morph-target names onto the canonical expression set.
///
/// First match wins; a later morph matching an already-mapped identifier is
/// kept out and disclosed as a duplicate. Gaze identifiers only exist in the
/// current schema variant and are skipped under the legacy one.
pub struct MapExpressions;

impl Stage for MapExpressions {
    fn id(&self) -> &'static str {
        ID
    }

    fn name(&self) -> &'static str {
        "Expression mapping"
    }

    fn order(&self) -> u32 {
        60
    }

    fn execute(&self, ctx: &mut ExportContext<'_>) -> StageReport {
        let mut report = StageReport::new();
        let mut map = ExpressionMap::new();
        let mut unmapped: Vec<String> = Vec::new();
        let allow_gaze = ctx.version.is_current();

        for (mesh_id, mesh) in ctx.avatar.meshes.iter() {
            for (index, morph) in mesh.morphs.iter().enumerate() {
                let lowered = morph.name.to_lowercase();
                let matched = ALIASES
                    .iter()
                    .filter(|(preset, _)| allow_gaze || !preset.is_gaze())
                    .find(|(_, aliases)| aliases.iter().any(|a| lowered.contains(a)))
                    .map(|(preset, _)| *preset);

                let Some(preset) = matched else {
                    unmapped.push(morph.name.clone());
                    continue;
                };

                let binding = MorphBinding {
                    mesh: mesh_id,
                    index: index as u32,
                    name: morph.name.clone(),
                };
                if !map.insert(preset, binding) {
                    let retained = map.get(preset).expect("occupied preset").name.clone();
                    report.push(Notification::warning(
                        ID,
                        format!(
                            "expression {preset:?} already mapped to \"{retained}\"; ignoring \"{}\"",
                            morph.name
                        ),
                    ));
                }
            }
        }

        let missing: Vec<String> = RECOMMENDED
            .iter()
            .filter(|p| !map.contains(**p))
            .map(|p| format!("{p:?}"))
            .collect();
        if missing.is_empty() {
            report.push(Notification::info(
                ID,
                "all recommended expressions are mapped",
            ));
        } else {
            report.push(Notification::warning(
                ID,
                format!("recommended expressions not mapped: {}", missing.join(", ")),
            ));
        }

        if !unmapped.is_empty() {
            let shown: Vec<&str> = unmapped
                .iter()
                .take(UNMAPPED_LIST_CAP)
                .map(String::as_str)
                .collect();
            let suffix = if unmapped.len() > UNMAPPED_LIST_CAP {
                format!(", +{} more", unmapped.len() - UNMAPPED_LIST_CAP)
            } else {
                String::new()
            };
            report.push(Notification::info(
                ID,
                format!("unmapped morph targets: {}{suffix}", shown.join(", ")),
            ));
        }

        ctx.exchange.expressions = Some(map);
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stages/map_expressions.rs"]
mod tests;
