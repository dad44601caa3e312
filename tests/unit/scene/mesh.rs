use super::*;
use glam::Mat4;

#[test]
fn store_hands_out_sequential_ids() {
    let mut store = MeshStore::new();
    let a = store.add(Mesh::new("a"));
    let b = store.add(Mesh::new("b"));
    assert_eq!(a, MeshId(0));
    assert_eq!(b, MeshId(1));
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(a).unwrap().name, "a");
    assert!(store.get(MeshId(9)).is_none());
}

#[test]
fn duplicate_creates_an_independent_asset() {
    let mut store = MeshStore::new();
    let mut mesh = Mesh::new("body");
    mesh.skin = Some(Skin {
        bones: vec![NodeIdx(1)],
        bindposes: vec![Mat4::IDENTITY],
    });
    let original = store.add(mesh);

    let copy = store.duplicate(original).unwrap();
    assert_ne!(original, copy);

    store
        .get_mut(copy)
        .unwrap()
        .skin
        .as_mut()
        .unwrap()
        .bindposes[0] = Mat4::from_scale(glam::Vec3::splat(2.0));

    // The original is untouched.
    assert_eq!(
        store.get(original).unwrap().skin.as_ref().unwrap().bindposes[0],
        Mat4::IDENTITY
    );
}
