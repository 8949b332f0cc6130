use super::*;
use crate::timeline::primitive::Primitive;

fn scene() -> (SceneGraph, ObjectId) {
    let mut g = SceneGraph::new();
    let a = g
        .create_object([
            (Property::Opacity, Value::Scalar(1.0)),
            (Property::Position, Value::vec2(0.0, 0.0)),
        ])
        .unwrap();
    (g, a)
}

fn to(g: &SceneGraph, id: ObjectId, property: Property, v: Value, d: f64) -> Animation {
    Primitive::define(g, &[id], [(property, Change::To(v))], d, Ease::Linear)
        .unwrap()
        .into()
}

#[test]
fn sequential_children_get_absolute_spans() {
    let (g, a) = scene();
    let anim = Animation::sequential([
        to(&g, a, Property::Opacity, Value::Scalar(0.0), 2.0),
        to(&g, a, Property::Opacity, Value::Scalar(0.5), 3.0),
    ]);
    let s = flatten(&g, &anim).unwrap();
    assert_eq!(s.duration(), 5.0);
    let spans: Vec<_> = s.entries().iter().map(|e| (e.span.start, e.span.end)).collect();
    assert_eq!(spans, vec![(0.0, 2.0), (2.0, 5.0)]);
}

#[test]
fn chained_writes_start_from_the_previous_end() {
    let (g, a) = scene();
    let anim = Animation::sequential([
        to(&g, a, Property::Opacity, Value::Scalar(0.2), 1.0),
        to(&g, a, Property::Opacity, Value::Scalar(0.6), 1.0),
    ]);
    let s = flatten(&g, &anim).unwrap();
    assert_eq!(s.entries()[0].from, Value::Scalar(1.0));
    assert_eq!(s.entries()[1].from, Value::Scalar(0.2));
}

#[test]
fn relative_changes_resolve_against_the_chained_value() {
    let (g, a) = scene();
    let first = to(&g, a, Property::Position, Value::vec2(2.0, 0.0), 1.0);
    let second = Primitive::define(
        &g,
        &[a],
        [(Property::Position, Change::ShiftBy(Value::vec2(0.0, 3.0)))],
        1.0,
        Ease::Linear,
    )
    .unwrap();
    let s = flatten(&g, &Animation::sequential([first, second.into()])).unwrap();
    assert_eq!(s.entries()[1].to, Value::vec2(2.0, 3.0));
}

#[test]
fn run_time_scales_child_spans() {
    let (g, a) = scene();
    let anim = Animation::sequential([
        to(&g, a, Property::Opacity, Value::Scalar(0.0), 1.0),
        to(&g, a, Property::Opacity, Value::Scalar(1.0), 1.0),
    ])
    .with_run_time(4.0)
    .unwrap();
    let s = flatten(&g, &anim).unwrap();
    assert_eq!(s.duration(), 4.0);
    assert_eq!(s.entries()[1].span, TimeSpan { start: 2.0, end: 4.0 });
}

#[test]
fn removals_cover_descendants_at_the_earliest_time() {
    let (mut g, a) = scene();
    let grp = g.group(&[a]).unwrap();
    let anim = Animation::sequential([
        Animation::wait(1.0).unwrap(),
        Primitive::remove(&g, &[grp]).unwrap().into(),
        Animation::wait(1.0).unwrap(),
        Primitive::remove(&g, &[a]).unwrap().into(),
    ]);
    let s = flatten(&g, &anim).unwrap();
    assert_eq!(s.removals().get(&grp), Some(&1.0));
    assert_eq!(s.removals().get(&a), Some(&1.0));
    assert!(!s.is_removed_at(a, 0.5));
    assert!(s.is_removed_at(a, 1.0));
}

#[test]
fn objects_removed_from_the_graph_after_definition_are_not_found() {
    let (mut g, a) = scene();
    let anim = to(&g, a, Property::Opacity, Value::Scalar(0.0), 1.0);
    g.remove(a).unwrap();
    assert!(matches!(
        flatten(&g, &anim),
        Err(TimeweaveError::NotFound(_))
    ));
}

#[test]
fn malformed_stagger_fails_at_flatten() {
    let (g, a) = scene();
    let anim = Animation::staggered(
        [
            to(&g, a, Property::Opacity, Value::Scalar(0.0), 1.0),
            to(&g, a, Property::Opacity, Value::Scalar(1.0), 2.0),
        ],
        0.5,
    )
    .unwrap();
    assert!(matches!(
        flatten(&g, &anim),
        Err(TimeweaveError::MalformedComposite(_))
    ));
}

#[test]
fn fingerprint_is_stable_and_sensitive() {
    let (g, a) = scene();
    let anim = to(&g, a, Property::Opacity, Value::Scalar(0.0), 1.0);
    let s1 = flatten(&g, &anim).unwrap();
    let s2 = flatten(&g, &anim).unwrap();
    assert_eq!(s1, s2);
    assert_eq!(s1.fingerprint(), s2.fingerprint());

    let other = to(&g, a, Property::Opacity, Value::Scalar(0.1), 1.0);
    assert_ne!(s1.fingerprint(), flatten(&g, &other).unwrap().fingerprint());
}

#[test]
fn resolve_at_prefers_the_latest_ordered_active_entry() {
    let span = TimeSpan::new(0.0, 2.0).unwrap();
    let mk = |to: f64, order: u64| ScheduleEntry {
        span,
        object: ObjectId(1),
        property: Property::Opacity,
        from: Value::Scalar(0.0),
        to: Value::Scalar(to),
        ease: Ease::Linear,
        order,
    };
    let lo = mk(1.0, 0);
    let hi = mk(10.0, 1);
    let entries = [&lo, &hi];
    let d = Value::Scalar(-1.0);
    assert_eq!(resolve_at(&entries, 1.0, &d).unwrap(), Value::Scalar(5.0));
    assert_eq!(resolve_at(&entries, 3.0, &d).unwrap(), Value::Scalar(10.0));
    assert_eq!(resolve_at(&entries, -1.0, &d).unwrap(), d);
}
