use super::*;
use crate::pipeline::context::TargetVersion;
use crate::pipeline::notify::Severity;
use crate::scene::avatar::AvatarScene;
use crate::scene::mesh::{Mesh, Skin};
use crate::scene::model::{SceneGraph, SceneNode};
use glam::{Quat, Vec3};

fn bone_at(
    g: &mut SceneGraph,
    parent: NodeIdx,
    name: &str,
    role: BoneRole,
    translation: Vec3,
    rotation: Quat,
) -> NodeIdx {
    let mut n = SceneNode::new(name);
    n.role = Some(role);
    n.local.translation = translation;
    n.local.rotation = rotation;
    g.add_child(parent, n)
}

/// Minimal armless rig: hips plus a left arm chain with a bent upper arm,
/// and a skinned mesh bound to the arm bones.
fn arm_rig(upper_arm_rotation: Quat) -> (AvatarScene, NodeIdx, NodeIdx) {
    use BoneRole::*;

    let mut scene = AvatarScene::new();
    let g = &mut scene.graph;
    let root = g.add_root(SceneNode::new("root"));
    let hips = bone_at(g, root, "hips", Hips, Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);
    let upper_arm = bone_at(
        g,
        hips,
        "upper_arm_l",
        LeftUpperArm,
        Vec3::new(0.2, 0.4, 0.0),
        upper_arm_rotation,
    );
    let lower_arm = bone_at(
        g,
        upper_arm,
        "lower_arm_l",
        LeftLowerArm,
        Vec3::new(0.3, 0.0, 0.0),
        Quat::IDENTITY,
    );

    let body = g.add_child(root, SceneNode::new("body"));
    let skin_world = scene.graph.world_matrix(body);
    let bindposes = vec![
        scene.graph.world_matrix(upper_arm).inverse() * skin_world,
        scene.graph.world_matrix(lower_arm).inverse() * skin_world,
    ];
    let mut mesh = Mesh::new("body");
    mesh.skin = Some(Skin {
        bones: vec![upper_arm, lower_arm],
        bindposes,
    });
    let mesh = scene.meshes.add(mesh);
    scene.graph.node_mut(body).mesh = Some(mesh);

    (scene, upper_arm, lower_arm)
}

#[test]
fn bent_limb_is_baked_and_bindposes_recomputed_on_a_duplicate() {
    let (source, upper_arm, lower_arm) =
        arm_rig(Quat::from_rotation_z(30f32.to_radians()));
    let lower_world_before = source.graph.world_position(lower_arm);

    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = BakePose.execute(&mut ctx);
    assert!(report.can_continue());

    let g = &ctx.avatar.graph;
    // The bone's local rotation is gone; the child's world pose survived.
    assert!(
        g.node(upper_arm).local.rotation.dot(Quat::IDENTITY).abs() > 1.0 - 1e-4
    );
    assert!(g.world_position(lower_arm).abs_diff_eq(lower_world_before, 1e-4));
    assert_eq!(ctx.exchange.baked_bones, vec![upper_arm]);

    // The mesh was repointed to a duplicated asset with recomputed
    // bindposes; the original asset is untouched.
    let body = NodeIdx(4);
    let new_mesh_id = g.node(body).mesh.expect("mesh attached");
    assert_ne!(new_mesh_id, MeshId(0));

    let skin_world = g.world_matrix(body);
    let skin = ctx
        .avatar
        .meshes
        .get(new_mesh_id)
        .unwrap()
        .skin
        .as_ref()
        .unwrap();
    for (i, &bone) in skin.bones.iter().enumerate() {
        let expected = g.world_matrix(bone).inverse() * skin_world;
        assert!(
            skin.bindposes[i].abs_diff_eq(expected, 1e-4),
            "bindpose {i} mismatch"
        );
    }

    let original = ctx.avatar.meshes.get(MeshId(0)).unwrap();
    let source_skin = source.meshes.get(MeshId(0)).unwrap().skin.as_ref().unwrap();
    assert_eq!(
        original.skin.as_ref().unwrap().bindposes,
        source_skin.bindposes
    );
}

#[test]
fn sub_threshold_rotation_is_left_untouched() {
    let (source, _upper_arm, _lower_arm) =
        arm_rig(Quat::from_rotation_z(3f32.to_radians()));

    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = BakePose.execute(&mut ctx);

    assert!(report.can_continue());
    assert!(report.notifications.is_empty());
    assert!(ctx.exchange.baked_bones.is_empty());
    // Mesh was not duplicated.
    assert_eq!(ctx.avatar.meshes.len(), 1);
}

#[test]
fn missing_hips_halts() {
    let mut source = AvatarScene::new();
    source.graph.add_root(SceneNode::new("root"));
    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = BakePose.execute(&mut ctx);
    assert!(!report.can_continue());
}

#[test]
fn rig_without_limb_bones_warns_and_continues() {
    let mut source = AvatarScene::new();
    let root = source.graph.add_root(SceneNode::new("root"));
    let mut hips = SceneNode::new("hips");
    hips.role = Some(BoneRole::Hips);
    source.graph.add_child(root, hips);

    let mut ctx = ExportContext::new(&source, TargetVersion::Current);
    let report = BakePose.execute(&mut ctx);
    assert!(report.can_continue());
    assert!(
        report
            .notifications
            .iter()
            .any(|n| n.severity == Severity::Warning && n.message.contains("no limb bones"))
    );
}
