use super::*;
use crate::pipeline::context::TargetVersion;
use crate::pipeline::notify::Severity;
use crate::scene::avatar::AvatarScene;
use crate::scene::mesh::{Mesh, MorphTarget};
use crate::scene::model::SceneNode;

fn scene_with_morphs(names: &[&str]) -> AvatarScene {
    let mut scene = AvatarScene::new();
    let root = scene.graph.add_root(SceneNode::new("root"));
    let face = scene.graph.add_child(root, SceneNode::new("face"));
    let mut mesh = Mesh::new("face");
    mesh.morphs = names.iter().map(|n| MorphTarget::new(*n)).collect();
    let mesh = scene.meshes.add(mesh);
    scene.graph.node_mut(face).mesh = Some(mesh);
    scene
}

fn run(names: &[&str], version: TargetVersion) -> (ExpressionMap, StageReport) {
    let source = scene_with_morphs(names);
    let mut ctx = ExportContext::new(&source, version);
    let report = MapExpressions.execute(&mut ctx);
    (ctx.exchange.expressions.expect("map published"), report)
}

#[test]
fn first_match_wins_and_duplicates_are_disclosed() {
    let (map, report) = run(&["vrc.v_aa", "mouth_a"], TargetVersion::Current);

    let binding = map.get(ExpressionPreset::Aa).expect("aa mapped");
    assert_eq!(binding.name, "vrc.v_aa");
    assert_eq!(binding.index, 0);

    let duplicate: Vec<_> = report
        .notifications
        .iter()
        .filter(|n| n.severity == Severity::Warning && n.message.contains("already mapped"))
        .collect();
    assert_eq!(duplicate.len(), 1);
    assert!(duplicate[0].message.contains("\"vrc.v_aa\""));
    assert!(duplicate[0].message.contains("\"mouth_a\""));
}

#[test]
fn matching_is_case_insensitive_and_substring_based() {
    let (map, _) = run(&["Face.M_F00_000_00_Fcl_MTH_A", "EyeBlink"], TargetVersion::Current);
    assert!(map.get(ExpressionPreset::Blink).is_some());
    // "mth_a" does not hit any alias; "mouth_a" style names do.
    let (map, _) = run(&["Mouth_A_Open"], TargetVersion::Current);
    assert_eq!(map.get(ExpressionPreset::Aa).unwrap().name, "Mouth_A_Open");
}

#[test]
fn one_eyed_blinks_do_not_fall_into_the_generic_slot() {
    let (map, _) = run(&["blink_l", "blink_r", "blink"], TargetVersion::Current);
    assert_eq!(map.get(ExpressionPreset::BlinkLeft).unwrap().name, "blink_l");
    assert_eq!(map.get(ExpressionPreset::BlinkRight).unwrap().name, "blink_r");
    assert_eq!(map.get(ExpressionPreset::Blink).unwrap().name, "blink");
}

#[test]
fn full_recommended_coverage_reports_an_info() {
    let (_, report) = run(
        &[
            "joy", "angry", "sorrow", "fun", "surprised", "v_aa", "v_ih", "v_ou", "v_e", "v_oh",
            "blink",
        ],
        TargetVersion::Current,
    );
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.severity == Severity::Info
                && n.message == "all recommended expressions are mapped")
    );
}

#[test]
fn missing_recommended_members_aggregate_into_one_warning() {
    let (_, report) = run(&["joy", "v_aa"], TargetVersion::Current);
    let coverage: Vec<_> = report
        .notifications
        .iter()
        .filter(|n| n.message.contains("recommended expressions not mapped"))
        .collect();
    assert_eq!(coverage.len(), 1);
    assert!(coverage[0].message.contains("Blink"));
    assert!(coverage[0].message.contains("Ih"));
    assert!(!coverage[0].message.contains("Happy"));
}

#[test]
fn unmapped_morphs_are_batched_with_a_cap() {
    let names: Vec<String> = (0..13).map(|i| format!("custom_shape_{i:02}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let (_, report) = run(&refs, TargetVersion::Current);

    let unmapped: Vec<_> = report
        .notifications
        .iter()
        .filter(|n| n.message.starts_with("unmapped morph targets"))
        .collect();
    assert_eq!(unmapped.len(), 1);
    assert!(unmapped[0].message.contains("custom_shape_09"));
    assert!(!unmapped[0].message.contains("custom_shape_10"));
    assert!(unmapped[0].message.ends_with("+3 more"));
}

#[test]
fn gaze_presets_only_exist_in_the_current_variant() {
    let (map, _) = run(&["look_up"], TargetVersion::Current);
    assert!(map.get(ExpressionPreset::LookUp).is_some());

    let (map, report) = run(&["look_up"], TargetVersion::Legacy);
    assert!(map.get(ExpressionPreset::LookUp).is_none());
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.message.starts_with("unmapped morph targets")
                && n.message.contains("look_up"))
    );
}
