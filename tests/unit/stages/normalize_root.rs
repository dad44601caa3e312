use super::*;
use crate::pipeline::context::TargetVersion;
use crate::scene::avatar::AvatarScene;
use crate::scene::model::{SceneNode, Transform};
use glam::Quat;

fn assert_rot_eq(a: Quat, b: Quat) {
    assert!(a.dot(b).abs() > 1.0 - 1e-4, "rotations differ: {a:?} vs {b:?}");
}

fn scene_with_armature(armature_rotation: Quat) -> AvatarScene {
    let mut scene = AvatarScene::new();
    let root = scene.graph.add_root(SceneNode::new("root"));

    let mut armature = SceneNode::new("armature");
    armature.local.rotation = armature_rotation;
    let armature = scene.graph.add_child(root, armature);

    let mut hips = SceneNode::new("hips");
    hips.role = Some(BoneRole::Hips);
    hips.local.translation = Vec3::new(0.0, 1.0, 0.0);
    scene.graph.add_child(armature, hips);
    scene
}

#[test]
fn quarter_turn_armature_rotation_is_baked_and_disclosed() {
    let source = scene_with_armature(Quat::from_rotation_x(-90f32.to_radians()));
    let hips_world_before = source.graph.world_position(crate::foundation::ids::NodeIdx(2));
    let hips_rot_before = source.graph.world_rotation(crate::foundation::ids::NodeIdx(2));

    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = NormalizeRoot.execute(&mut ctx);
    assert!(report.can_continue());

    let armature = crate::foundation::ids::NodeIdx(1);
    let hips = crate::foundation::ids::NodeIdx(2);
    assert_rot_eq(ctx.avatar.graph.node(armature).local.rotation, Quat::IDENTITY);
    assert!(
        ctx.avatar
            .graph
            .world_position(hips)
            .abs_diff_eq(hips_world_before, 1e-4)
    );
    assert_rot_eq(ctx.avatar.graph.world_rotation(hips), hips_rot_before);
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.message.contains("coordinate-system mismatch"))
    );
}

#[test]
fn sub_threshold_armature_rotation_is_left_untouched_and_unreported() {
    let rotation = Quat::from_rotation_x(45f32.to_radians());
    let source = scene_with_armature(rotation);
    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = NormalizeRoot.execute(&mut ctx);

    assert!(report.notifications.is_empty());
    assert_rot_eq(
        ctx.avatar.graph.node(crate::foundation::ids::NodeIdx(1)).local.rotation,
        rotation,
    );
}

#[test]
fn non_identity_root_is_normalized_preserving_world_poses() {
    let mut source = scene_with_armature(Quat::IDENTITY);
    source.graph.node_mut(crate::foundation::ids::NodeIdx(0)).local.translation =
        Vec3::new(2.0, 0.0, -1.0);
    let hips = crate::foundation::ids::NodeIdx(2);
    let before = source.graph.world_position(hips);

    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = NormalizeRoot.execute(&mut ctx);

    let root = crate::foundation::ids::NodeIdx(0);
    assert_eq!(ctx.avatar.graph.node(root).local, Transform::IDENTITY);
    assert!(ctx.avatar.graph.world_position(hips).abs_diff_eq(before, 1e-4));
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.message.contains("normalized to identity"))
    );
}

#[test]
fn empty_scene_halts() {
    let source = AvatarScene::new();
    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = NormalizeRoot.execute(&mut ctx);
    assert!(!report.can_continue());
}
