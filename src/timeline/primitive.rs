use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::value::{Property, Value};
use crate::foundation::core::check_duration;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::foundation::ids::ObjectId;
use crate::scene::graph::{SceneGraph, check_value};

/// How a keyframe derives its end value from the start value resolved at its window start.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    /// Absolute end value.
    To(Value),
    /// The object's design-time default for the property.
    ToDefault,
    /// Multiply the start value (scalars and vectors).
    ScaleBy(f64),
    /// Add to the start value (scalars and vectors).
    ShiftBy(Value),
}

impl Change {
    /// Resolve the end value given the start value and the object's default.
    pub(crate) fn resolve(&self, from: &Value, default: &Value) -> TimeweaveResult<Value> {
        match self {
            Self::To(v) => Ok(v.clone()),
            Self::ToDefault => Ok(default.clone()),
            Self::ScaleBy(k) => from.scaled(*k),
            Self::ShiftBy(d) => from.shifted(d),
        }
    }

    fn check_against(&self, property: &Property, default: &Value) -> TimeweaveResult<()> {
        match self {
            Self::To(v) => {
                check_value(property, v)?;
                if v.kind() != default.kind() {
                    return Err(TimeweaveError::type_mismatch(format!(
                        "property '{property}' is {} but change targets {}",
                        default.kind(),
                        v.kind()
                    )));
                }
                Ok(())
            }
            Self::ToDefault => Ok(()),
            Self::ScaleBy(k) => {
                if !k.is_finite() {
                    return Err(TimeweaveError::validation(format!(
                        "scale factor for '{property}' must be finite"
                    )));
                }
                default.scaled(*k).map(|_| ())
            }
            Self::ShiftBy(d) => {
                check_value(property, d)?;
                default.shifted(d).map(|_| ())
            }
        }
    }
}

/// One property change inside a primitive, active over the local window `[t0, t1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyKeyframe {
    /// Animated property.
    pub property: Property,
    /// End-value rule.
    pub change: Change,
    /// Easing over the window.
    pub ease: Ease,
    /// Window start, seconds from the primitive start.
    pub t0: f64,
    /// Window end, seconds from the primitive start.
    pub t1: f64,
}

/// What a primitive does besides occupying time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveAction {
    /// Interpolate property keyframes (a keyframe-less primitive is a wait).
    Animate,
    /// Detach targets and their descendants from snapshots at the primitive start.
    Remove,
}

/// Smallest indivisible timed change: keyframes applied to concrete objects over a duration.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    targets: SmallVec<[ObjectId; 4]>,
    keyframes: Vec<PropertyKeyframe>,
    // (keyframe index, concrete object) pairs after group expansion.
    writes: Vec<(usize, ObjectId)>,
    duration: f64,
    action: PrimitiveAction,
}

impl Primitive {
    /// Define a primitive moving each listed property of every target to its end value over
    /// `duration` seconds.
    pub fn define(
        graph: &SceneGraph,
        targets: &[ObjectId],
        changes: impl IntoIterator<Item = (Property, Change)>,
        duration: f64,
        ease: Ease,
    ) -> TimeweaveResult<Self> {
        let mut b = PrimitiveBuilder::new(targets, duration);
        for (property, change) in changes {
            b = b.keyframe(property, change, ease);
        }
        b.build(graph)
    }

    /// Start a builder for a primitive with per-keyframe easing and windows.
    pub fn builder(targets: &[ObjectId], duration: f64) -> PrimitiveBuilder {
        PrimitiveBuilder::new(targets, duration)
    }

    /// A target-less primitive that only occupies `duration` seconds.
    pub fn wait(duration: f64) -> TimeweaveResult<Self> {
        let duration = check_duration("wait duration", duration)?;
        Ok(Self {
            targets: SmallVec::new(),
            keyframes: Vec::new(),
            writes: Vec::new(),
            duration,
            action: PrimitiveAction::Animate,
        })
    }

    /// An instantaneous removal of `targets` (and their descendants) from later snapshots.
    pub fn remove(graph: &SceneGraph, targets: &[ObjectId]) -> TimeweaveResult<Self> {
        if targets.is_empty() {
            return Err(TimeweaveError::validation("remove needs at least one target"));
        }
        for &id in targets {
            graph.object(id)?;
            if id == graph.root() {
                return Err(TimeweaveError::validation("the scene root cannot be removed"));
            }
        }
        Ok(Self {
            targets: targets.iter().copied().collect(),
            keyframes: Vec::new(),
            writes: Vec::new(),
            duration: 0.0,
            action: PrimitiveAction::Remove,
        })
    }

    /// Declared duration in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Targets as requested (before group expansion).
    pub fn targets(&self) -> &[ObjectId] {
        &self.targets
    }

    /// Keyframes in declaration order.
    pub fn keyframes(&self) -> &[PropertyKeyframe] {
        &self.keyframes
    }

    /// What this primitive does.
    pub fn action(&self) -> PrimitiveAction {
        self.action
    }

    /// Concrete `(keyframe, object)` writes after group expansion.
    pub(crate) fn writes(&self) -> impl Iterator<Item = (&PropertyKeyframe, ObjectId)> {
        self.writes.iter().map(|&(k, id)| (&self.keyframes[k], id))
    }
}

/// Builder for [`Primitive`] values.
pub struct PrimitiveBuilder {
    targets: SmallVec<[ObjectId; 4]>,
    duration: f64,
    keyframes: Vec<(Property, Change, Ease, Option<(f64, f64)>)>,
}

impl PrimitiveBuilder {
    /// Create a builder for `targets` lasting `duration` seconds.
    pub fn new(targets: &[ObjectId], duration: f64) -> Self {
        Self {
            targets: targets.iter().copied().collect(),
            duration,
            keyframes: Vec::new(),
        }
    }

    /// Add a keyframe spanning the whole primitive.
    pub fn keyframe(mut self, property: Property, change: Change, ease: Ease) -> Self {
        self.keyframes.push((property, change, ease, None));
        self
    }

    /// Add a keyframe restricted to the local window `[t0, t1]` (seconds).
    pub fn keyframe_in(
        mut self,
        property: Property,
        change: Change,
        ease: Ease,
        t0: f64,
        t1: f64,
    ) -> Self {
        self.keyframes.push((property, change, ease, Some((t0, t1))));
        self
    }

    /// Validate against `graph` and build.
    ///
    /// Unknown targets, and targets whose subtree does not declare a keyframed property, fail
    /// with `NotFound`; malformed timing fails with `InvalidInterval`.
    pub fn build(self, graph: &SceneGraph) -> TimeweaveResult<Primitive> {
        let duration = check_duration("primitive duration", self.duration)?;
        for &id in &self.targets {
            graph.object(id)?;
        }
        if self.targets.is_empty() && !self.keyframes.is_empty() {
            return Err(TimeweaveError::validation(
                "a primitive with keyframes needs at least one target",
            ));
        }

        let mut keyframes = Vec::with_capacity(self.keyframes.len());
        let mut writes = Vec::new();
        for (k, (property, change, ease, window)) in self.keyframes.into_iter().enumerate() {
            let (t0, t1) = window.unwrap_or((0.0, duration));
            check_window(&property, t0, t1, duration)?;

            let before = writes.len();
            for &target in &self.targets {
                let mut declared = false;
                for id in graph.descendants(target)? {
                    let obj = graph.object(id)?;
                    let Some(default) = obj.properties().get(&property) else {
                        continue;
                    };
                    declared = true;
                    change.check_against(&property, default)?;
                    if !writes[before..].contains(&(k, id)) {
                        writes.push((k, id));
                    }
                }
                if !declared {
                    return Err(TimeweaveError::not_found(format!(
                        "property '{property}' on {target} or its descendants"
                    )));
                }
            }

            keyframes.push(PropertyKeyframe {
                property,
                change,
                ease,
                t0,
                t1,
            });
        }

        Ok(Primitive {
            targets: self.targets,
            keyframes,
            writes,
            duration,
            action: PrimitiveAction::Animate,
        })
    }
}

fn check_window(property: &Property, t0: f64, t1: f64, duration: f64) -> TimeweaveResult<()> {
    if !t0.is_finite() || !t1.is_finite() {
        return Err(TimeweaveError::invalid_interval(format!(
            "keyframe window for '{property}' must be finite"
        )));
    }
    if t0 < 0.0 || t0 > t1 || t1 > duration {
        return Err(TimeweaveError::invalid_interval(format!(
            "keyframe window for '{property}' must satisfy 0 <= t0 <= t1 <= {duration} (got [{t0}, {t1}])"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/primitive.rs"]
mod tests;
