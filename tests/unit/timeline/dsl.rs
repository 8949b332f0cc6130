use super::*;
use crate::foundation::error::TimeweaveError;
use crate::timeline::composite::CompositionMode;
use crate::timeline::primitive::PrimitiveAction;

fn scene() -> (SceneGraph, ObjectId, ObjectId) {
    let mut g = SceneGraph::new();
    let dot = g
        .create_object([
            (Property::Opacity, Value::Scalar(1.0)),
            (Property::Position, Value::vec2(0.0, 0.0)),
            (Property::Scale, Value::Scalar(1.0)),
            (Property::FillColor, Value::Color(Rgba::rgb(1.0, 1.0, 1.0))),
            (Property::FillOpacity, Value::Scalar(0.8)),
            (Property::DrawProgress, Value::Scalar(1.0)),
        ])
        .unwrap();
    let label = g
        .create_object([
            (Property::Opacity, Value::Scalar(1.0)),
            (Property::Text, Value::from("hello")),
        ])
        .unwrap();
    (g, dot, label)
}

fn primitive(anim: &Animation) -> &Primitive {
    match anim {
        Animation::Primitive(p) => p,
        Animation::Composite(_) => panic!("expected primitive"),
    }
}

#[test]
fn fade_in_starts_transparent_and_returns_to_default() {
    let (g, dot, _) = scene();
    let anim = fade_in(&g, &[dot], None, 1.0, Ease::Smooth).unwrap();
    let kfs = primitive(&anim).keyframes();
    assert_eq!(kfs.len(), 2);
    assert_eq!((kfs[0].t0, kfs[0].t1), (0.0, 0.0));
    assert_eq!(kfs[0].change, Change::To(Value::Scalar(0.0)));
    assert_eq!(kfs[1].change, Change::ToDefault);
    assert_eq!((kfs[1].t0, kfs[1].t1), (0.0, 1.0));
}

#[test]
fn fade_in_with_shift_needs_a_position() {
    let (g, dot, label) = scene();
    let anim = fade_in(&g, &[dot], Some(Vec2::new(0.0, 1.0)), 1.0, Ease::Linear).unwrap();
    assert_eq!(primitive(&anim).keyframes().len(), 4);

    let err = fade_in(&g, &[label], Some(Vec2::new(0.0, 1.0)), 1.0, Ease::Linear).unwrap_err();
    assert!(matches!(err, TimeweaveError::NotFound(_)));
}

#[test]
fn fade_out_ends_with_a_removal() {
    let (g, dot, _) = scene();
    let anim = fade_out(&g, &[dot], None, 0.5, Ease::Linear).unwrap();
    assert_eq!(anim.duration().unwrap(), 0.5);
    let Animation::Composite(c) = &anim else {
        panic!("expected composite");
    };
    assert_eq!(c.mode(), CompositionMode::Sequential);
    assert_eq!(
        primitive(&c.children()[1]).action(),
        PrimitiveAction::Remove
    );
}

#[test]
fn pulse_scales_there_and_back() {
    let (g, dot, label) = scene();
    let anim = pulse(&g, &[dot], 1.2, 0.4).unwrap();
    let kf = &primitive(&anim).keyframes()[0];
    assert_eq!(kf.ease, Ease::ThereAndBack);
    assert_eq!(kf.change, Change::ScaleBy(1.2));
    assert!(pulse(&g, &[label], 1.2, 0.4).is_err());
}

#[test]
fn color_presets_check_paint_values() {
    let (g, dot, _) = scene();
    set_color(&g, &[dot], Rgba::rgb(1.0, 0.0, 0.0), 1.0, Ease::Linear).unwrap();
    color_by_gradient(
        &g,
        &[dot],
        vec![Rgba::rgb(1.0, 0.0, 0.0), Rgba::rgb(0.0, 0.0, 1.0)],
        1.0,
        Ease::Linear,
    )
    .unwrap();
    assert!(matches!(
        color_by_gradient(&g, &[dot], Vec::new(), 1.0, Ease::Linear),
        Err(TimeweaveError::Validation(_))
    ));
}

#[test]
fn draw_border_then_fill_splits_the_duration() {
    let (g, dot, _) = scene();
    let anim = draw_border_then_fill(&g, &[dot], 2.0, Ease::Linear).unwrap();
    let windows: Vec<_> = primitive(&anim)
        .keyframes()
        .iter()
        .map(|k| (k.property.clone(), k.t0, k.t1))
        .collect();
    assert_eq!(
        windows,
        vec![
            (Property::DrawProgress, 0.0, 0.0),
            (Property::DrawProgress, 0.0, 1.0),
            (Property::FillOpacity, 0.0, 0.0),
            (Property::FillOpacity, 1.0, 2.0),
        ]
    );
}

#[test]
fn lagged_map_staggers_one_child_per_target() {
    let (g, dot, label) = scene();
    let anim = lagged_map(&[dot, label], 0.25, |id| {
        fade_in(&g, &[id], None, 1.0, Ease::Linear)
    })
    .unwrap();
    assert_eq!(anim.duration().unwrap(), 1.25);

    let err = lagged_map(&[dot, label], 0.25, |id| {
        fade_in(&g, &[id], Some(Vec2::new(1.0, 0.0)), 1.0, Ease::Linear)
    })
    .unwrap_err();
    assert!(matches!(err, TimeweaveError::NotFound(_)));
}
