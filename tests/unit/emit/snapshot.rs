use super::*;
use crate::animation::ease::Ease;
use crate::schedule::flatten::flatten;
use crate::timeline::composite::Animation;
use crate::timeline::primitive::{Change, Primitive};

fn scene() -> (SceneGraph, ObjectId, ObjectId, ObjectId) {
    let mut g = SceneGraph::new();
    let a = g
        .create_named("a", [(Property::Opacity, Value::Scalar(1.0))])
        .unwrap();
    let b = g
        .create_object([(Property::Opacity, Value::Scalar(1.0))])
        .unwrap();
    let grp = g.group_named("pair", &[a, b]).unwrap();
    (g, a, b, grp)
}

#[test]
fn snapshot_carries_hierarchy_and_names() {
    let (g, a, b, grp) = scene();
    let s = flatten(&g, &Animation::wait(1.0).unwrap()).unwrap();
    let snap = s.snapshot_at(0.0).unwrap();
    assert_eq!(snap.root, g.root());
    assert_eq!(snap.objects[&grp].children, vec![a, b]);
    assert_eq!(snap.objects[&grp].name.as_deref(), Some("pair"));
    assert_eq!(snap.objects[&a].parent, Some(grp));
    assert_eq!(snap.paint_order(), vec![g.root(), grp, a, b]);
}

#[test]
fn removed_children_are_pruned() {
    let (g, a, b, grp) = scene();
    let anim = Animation::sequential([
        Primitive::define(
            &g,
            &[a],
            [(Property::Opacity, Change::To(Value::Scalar(0.0)))],
            1.0,
            Ease::Linear,
        )
        .unwrap()
        .into(),
        Primitive::remove(&g, &[a]).unwrap().into(),
    ]);
    let s = flatten(&g, &anim).unwrap();
    let snap = s.snapshot_at(1.5).unwrap();
    assert!(!snap.objects.contains_key(&a));
    assert_eq!(snap.objects[&grp].children, vec![b]);
}

#[test]
fn snapshot_serializes_ids_and_tagged_values() {
    let (g, a, _, _) = scene();
    let s = flatten(&g, &Animation::wait(1.0).unwrap()).unwrap();
    let json = serde_json::to_value(s.snapshot_at(0.0).unwrap()).unwrap();
    let key = a.0.to_string();
    assert_eq!(json["objects"][&key]["properties"]["opacity"]["scalar"], 1.0);
    assert_eq!(json["objects"][&key]["name"], "a");
}
