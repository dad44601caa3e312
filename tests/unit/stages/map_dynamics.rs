use super::*;
use crate::pipeline::context::TargetVersion;
use crate::pipeline::notify::Severity;
use crate::scene::avatar::AvatarScene;
use crate::scene::dynamics::SpringBone;
use crate::scene::model::SceneNode;

/// Root, a hair root carrying the component under test, and two chain
/// segments.
fn hair_scene() -> (AvatarScene, NodeIdx, NodeIdx, NodeIdx) {
    let mut scene = AvatarScene::new();
    let root = scene.graph.add_root(SceneNode::new("root"));
    let hair_root = scene.graph.add_child(root, SceneNode::new("hair_root"));
    let mid = scene.graph.add_child(hair_root, SceneNode::new("hair_mid"));
    let tip = scene.graph.add_child(mid, SceneNode::new("hair_tip"));
    (scene, hair_root, mid, tip)
}

fn run(scene: &AvatarScene) -> (Vec<SpringBoneGroup>, StageReport) {
    let mut ctx = ExportContext::new(scene, TargetVersion::Current);
    let report = MapDynamics.execute(&mut ctx);
    (ctx.exchange.spring_groups, report)
}

#[test]
fn native_spring_bones_copy_through_without_approximation_warnings() {
    let (mut scene, hair_root, mid, tip) = hair_scene();
    scene.graph.node_mut(hair_root).spring = Some(SpringBone {
        stiffness: 2.0,
        gravity_power: 0.05,
        gravity_dir: Vec3::NEG_Y,
        drag_force: 0.3,
        hit_radius: 0.04,
    });

    let (groups, report) = run(&scene);
    assert_eq!(groups.len(), 1);
    let g = &groups[0];
    assert_eq!(g.source, "native spring bone");
    assert_eq!(g.stiffness, 2.0);
    assert_eq!(g.drag_force, 0.3);
    assert_eq!(g.bones, vec![hair_root, mid, tip]);
    assert!(
        !report
            .notifications
            .iter()
            .any(|n| n.severity == Severity::Warning)
    );
}

#[test]
fn chain_dynamics_schema_decomposes_its_gravity_vector() {
    let (mut scene, hair_root, mid, tip) = hair_scene();
    scene.graph.node_mut(hair_root).components.push(
        LooseComponent::new("DynamicBone")
            .with_field("m_Damping", FieldValue::Float(0.2))
            .with_field("m_Elasticity", FieldValue::Float(0.5))
            .with_field("m_Radius", FieldValue::Float(0.03))
            .with_field("m_Gravity", FieldValue::Vec3(Vec3::new(0.0, -0.01, 0.0)))
            .with_field("m_Root", FieldValue::Node(hair_root)),
    );

    let (groups, report) = run(&scene);
    assert_eq!(groups.len(), 1);
    let g = &groups[0];
    assert!((g.stiffness - 2.0).abs() < 1e-6);
    assert!((g.drag_force - 0.2).abs() < 1e-6);
    assert!((g.gravity_power - 0.01).abs() < 1e-6);
    assert!(g.gravity_dir.abs_diff_eq(Vec3::NEG_Y, 1e-6));
    assert!((g.hit_radius - 0.03).abs() < 1e-6);
    assert_eq!(g.bones, vec![hair_root, mid, tip]);

    // Third-party conversion is always disclosed as approximate.
    assert!(report.notifications.iter().any(|n| {
        n.severity == Severity::Warning && n.message.contains("converted approximately")
    }));
}

#[test]
fn constraint_physics_schema_maps_spring_inversely_to_drag() {
    let (mut scene, hair_root, _mid, _tip) = hair_scene();
    scene.graph.node_mut(hair_root).components.push(
        LooseComponent::new("VRC.SDK3.Dynamics.PhysBone.Components.VRCPhysBone")
            .with_field("pull", FieldValue::Float(0.5))
            .with_field("spring", FieldValue::Float(0.3))
            .with_field("gravity", FieldValue::Float(-0.5))
            .with_field("radius", FieldValue::Float(0.02)),
    );

    let (groups, _report) = run(&scene);
    assert_eq!(groups.len(), 1);
    let g = &groups[0];
    assert!((g.stiffness - 2.0).abs() < 1e-6);
    assert!((g.drag_force - 0.7).abs() < 1e-6);
    assert!((g.gravity_power - 0.5).abs() < 1e-6);
    // Negative gravity on this schema pushes up.
    assert!(g.gravity_dir.abs_diff_eq(Vec3::Y, 1e-6));
}

#[test]
fn unknown_component_types_yield_zero_detections() {
    let (mut scene, hair_root, _mid, _tip) = hair_scene();
    scene
        .graph
        .node_mut(hair_root)
        .components
        .push(LooseComponent::new("SomeVendor.ClothSim"));

    let (groups, report) = run(&scene);
    assert!(groups.is_empty());
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.message == "no secondary-motion components found")
    );
    assert!(
        !report
            .notifications
            .iter()
            .any(|n| n.severity == Severity::Warning)
    );
}

#[test]
fn malformed_fields_warn_and_fall_back_to_defaults() {
    let (mut scene, hair_root, _mid, _tip) = hair_scene();
    scene.graph.node_mut(hair_root).components.push(
        LooseComponent::new("DynamicBone")
            .with_field("m_Damping", FieldValue::Str("broken".to_owned())),
    );

    let (groups, report) = run(&scene);
    assert_eq!(groups.len(), 1);
    // Default damping survives the malformed field.
    assert!((groups[0].drag_force - 0.1).abs() < 1e-6);
    assert!(report.notifications.iter().any(|n| {
        n.severity == Severity::Warning
            && n.message.contains("m_Damping")
            && n.message.contains("unexpected value")
    }));
}

#[test]
fn missing_root_field_falls_back_to_the_host_bone() {
    let (mut scene, _hair_root, mid, tip) = hair_scene();
    scene
        .graph
        .node_mut(mid)
        .components
        .push(LooseComponent::new("DynamicBone"));

    let (groups, _report) = run(&scene);
    assert_eq!(groups[0].bones, vec![mid, tip]);
}
