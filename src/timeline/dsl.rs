//! Effect presets built on [`Primitive`] and [`Animation`].
//!
//! Each preset validates its targets against the graph up front, like any primitive.

use crate::animation::ease::Ease;
use crate::animation::value::{Property, Rgba, Value};
use crate::foundation::core::Vec2;
use crate::foundation::error::TimeweaveResult;
use crate::foundation::ids::ObjectId;
use crate::scene::graph::SceneGraph;
use crate::timeline::composite::Animation;
use crate::timeline::primitive::{Change, Primitive};

/// Fade targets in from transparent to their default opacity.
///
/// With `shift`, targets also travel from `position - shift` to their position.
pub fn fade_in(
    graph: &SceneGraph,
    targets: &[ObjectId],
    shift: Option<Vec2>,
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    let mut b = Primitive::builder(targets, duration)
        .keyframe_in(
            Property::Opacity,
            Change::To(Value::Scalar(0.0)),
            Ease::Linear,
            0.0,
            0.0,
        )
        .keyframe(Property::Opacity, Change::ToDefault, ease);
    if let Some(shift) = shift {
        b = b
            .keyframe_in(
                Property::Position,
                Change::ShiftBy(Value::Vec2(-shift)),
                Ease::Linear,
                0.0,
                0.0,
            )
            .keyframe(Property::Position, Change::ShiftBy(Value::Vec2(shift)), ease);
    }
    Ok(b.build(graph)?.into())
}

/// Fade targets out to transparent, then remove them from later snapshots.
pub fn fade_out(
    graph: &SceneGraph,
    targets: &[ObjectId],
    shift: Option<Vec2>,
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    let mut b = Primitive::builder(targets, duration).keyframe(
        Property::Opacity,
        Change::To(Value::Scalar(0.0)),
        ease,
    );
    if let Some(shift) = shift {
        b = b.keyframe(Property::Position, Change::ShiftBy(Value::Vec2(shift)), ease);
    }
    let fade = b.build(graph)?;
    let remove = Primitive::remove(graph, targets)?;
    Ok(Animation::sequential([fade.into(), remove.into()]))
}

/// Scale targets by `factor` and back again.
pub fn pulse(
    graph: &SceneGraph,
    targets: &[ObjectId],
    factor: f64,
    duration: f64,
) -> TimeweaveResult<Animation> {
    Ok(Primitive::define(
        graph,
        targets,
        [(Property::Scale, Change::ScaleBy(factor))],
        duration,
        Ease::ThereAndBack,
    )?
    .into())
}

/// Move targets by `delta`.
pub fn shift(
    graph: &SceneGraph,
    targets: &[ObjectId],
    delta: Vec2,
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    Ok(Primitive::define(
        graph,
        targets,
        [(Property::Position, Change::ShiftBy(Value::Vec2(delta)))],
        duration,
        ease,
    )?
    .into())
}

/// Blend the fill color of targets to `color`.
pub fn set_color(
    graph: &SceneGraph,
    targets: &[ObjectId],
    color: Rgba,
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    Ok(Primitive::define(
        graph,
        targets,
        [(Property::FillColor, Change::To(Value::Color(color)))],
        duration,
        ease,
    )?
    .into())
}

/// Blend the fill of targets into a multi-stop gradient.
pub fn color_by_gradient(
    graph: &SceneGraph,
    targets: &[ObjectId],
    stops: Vec<Rgba>,
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    Ok(Primitive::define(
        graph,
        targets,
        [(Property::FillColor, Change::To(Value::Gradient(stops)))],
        duration,
        ease,
    )?
    .into())
}

/// Trace outlines over the first half, then fade the fill in over the second half.
pub fn draw_border_then_fill(
    graph: &SceneGraph,
    targets: &[ObjectId],
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    let half = duration * 0.5;
    let prim = Primitive::builder(targets, duration)
        .keyframe_in(
            Property::DrawProgress,
            Change::To(Value::Scalar(0.0)),
            Ease::Linear,
            0.0,
            0.0,
        )
        .keyframe_in(
            Property::DrawProgress,
            Change::To(Value::Scalar(1.0)),
            ease,
            0.0,
            half,
        )
        .keyframe_in(
            Property::FillOpacity,
            Change::To(Value::Scalar(0.0)),
            Ease::Linear,
            0.0,
            0.0,
        )
        .keyframe_in(Property::FillOpacity, Change::ToDefault, ease, half, duration)
        .build(graph)?;
    Ok(prim.into())
}

/// Reveal targets by drawing them from nothing.
pub fn write(
    graph: &SceneGraph,
    targets: &[ObjectId],
    duration: f64,
    ease: Ease,
) -> TimeweaveResult<Animation> {
    let prim = Primitive::builder(targets, duration)
        .keyframe_in(
            Property::DrawProgress,
            Change::To(Value::Scalar(0.0)),
            Ease::Linear,
            0.0,
            0.0,
        )
        .keyframe(Property::DrawProgress, Change::To(Value::Scalar(1.0)), ease)
        .build(graph)?;
    Ok(prim.into())
}

/// Build one animation per target with `f` and stagger them by `lag_ratio`.
pub fn lagged_map<F>(targets: &[ObjectId], lag_ratio: f64, mut f: F) -> TimeweaveResult<Animation>
where
    F: FnMut(ObjectId) -> TimeweaveResult<Animation>,
{
    let children = targets
        .iter()
        .map(|&id| f(id))
        .collect::<TimeweaveResult<Vec<_>>>()?;
    Animation::staggered(children, lag_ratio)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/dsl.rs"]
mod tests;
