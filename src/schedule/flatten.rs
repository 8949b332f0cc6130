use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::animation::interpolate::interpolate;
use crate::animation::value::{Property, Value};
use crate::foundation::core::TimeSpan;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::foundation::fingerprint::{Fingerprint, StableHasher};
use crate::foundation::ids::ObjectId;
use crate::scene::graph::SceneGraph;
use crate::timeline::composite::Animation;
use crate::timeline::primitive::{Change, PrimitiveAction};

/// One resolved property write on the absolute timeline.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScheduleEntry {
    /// Absolute `[start, end)` interval in seconds.
    pub span: TimeSpan,
    /// Written object.
    pub object: ObjectId,
    /// Written property.
    pub property: Property,
    /// Value at the start of the span, resolved from earlier writes or the default.
    pub from: Value,
    /// Value at the end of the span.
    pub to: Value,
    /// Easing over the span.
    pub ease: Ease,
    /// Depth-first composition order; higher wins where writers overlap.
    pub order: u64,
}

/// Flattened, immutable timeline of property writes.
///
/// Built once by [`flatten`] and then only read; safe to share across threads.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Schedule {
    duration: f64,
    entries: Vec<ScheduleEntry>,
    removals: BTreeMap<ObjectId, f64>,
    #[serde(skip)]
    graph: SceneGraph,
    #[serde(skip)]
    index: BTreeMap<(ObjectId, Property), Vec<usize>>,
}

impl Schedule {
    /// Total duration of the flattened animation in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Entries sorted by `(start, order)`.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// Earliest absolute removal time per removed object.
    pub fn removals(&self) -> &BTreeMap<ObjectId, f64> {
        &self.removals
    }

    /// Scene graph the schedule was flattened against.
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Entries writing `(object, property)`, sorted by `(start, order)`.
    pub fn entries_for(&self, object: ObjectId, property: &Property) -> Vec<&ScheduleEntry> {
        self.index
            .get(&(object, property.clone()))
            .map(|ix| ix.iter().map(|&i| &self.entries[i]).collect())
            .unwrap_or_default()
    }

    pub(crate) fn has_writes(&self, object: ObjectId, property: &Property) -> bool {
        self.index.contains_key(&(object, property.clone()))
    }

    /// Return `true` when `object` has been removed at time `t`.
    pub fn is_removed_at(&self, object: ObjectId, t: f64) -> bool {
        self.removals.get(&object).is_some_and(|&at| t >= at)
    }

    /// Stable hash of every entry, removal and the duration, by bit pattern.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut h = StableHasher::new();
        h.write_f64(self.duration);
        h.write_u64(self.entries.len() as u64);
        for e in &self.entries {
            h.write_f64(e.span.start);
            h.write_f64(e.span.end);
            h.write_u32(e.object.0);
            h.write_str(e.property.as_str());
            hash_value(&mut h, &e.from);
            hash_value(&mut h, &e.to);
            h.write_u8(e.ease as u8);
            h.write_u64(e.order);
        }
        h.write_u64(self.removals.len() as u64);
        for (id, at) in &self.removals {
            h.write_u32(id.0);
            h.write_f64(*at);
        }
        h.finish()
    }
}

// Leaf write before start values are resolved.
struct RawWrite {
    span: TimeSpan,
    object: ObjectId,
    property: Property,
    change: Change,
    ease: Ease,
    order: u64,
}

#[derive(Default)]
struct Walk {
    writes: Vec<RawWrite>,
    removals: BTreeMap<ObjectId, f64>,
    order: u64,
}

/// Flatten an animation tree into an absolute-time [`Schedule`].
///
/// Children are visited depth-first in list order, so the result is a pure function of
/// `graph` and `root`. Start values of chained writes come from whatever the schedule
/// resolves for the same `(object, property)` at the write's start.
#[tracing::instrument(skip_all)]
pub fn flatten(graph: &SceneGraph, root: &Animation) -> TimeweaveResult<Schedule> {
    let duration = root.duration()?;
    let mut walk = Walk::default();
    walk.visit(graph, root, 0.0, 1.0)?;

    let mut raw = walk.writes;
    raw.sort_by(|a, b| {
        a.span
            .start
            .total_cmp(&b.span.start)
            .then(a.order.cmp(&b.order))
    });

    let mut entries: Vec<ScheduleEntry> = Vec::with_capacity(raw.len());
    let mut index: BTreeMap<(ObjectId, Property), Vec<usize>> = BTreeMap::new();
    for w in raw {
        let default = graph.get_property(w.object, &w.property)?;
        let key = (w.object, w.property.clone());
        let prior: Vec<&ScheduleEntry> = index
            .get(&key)
            .map(|ix| ix.iter().map(|&i| &entries[i]).collect())
            .unwrap_or_default();
        let from = resolve_at(&prior, w.span.start, default)?;
        let to = w.change.resolve(&from, default)?;
        if to.kind() != default.kind() {
            return Err(TimeweaveError::type_mismatch(format!(
                "property '{}' on {} is {} but resolved to {}",
                w.property,
                w.object,
                default.kind(),
                to.kind()
            )));
        }
        index.entry(key).or_default().push(entries.len());
        entries.push(ScheduleEntry {
            span: w.span,
            object: w.object,
            property: w.property,
            from,
            to,
            ease: w.ease,
            order: w.order,
        });
    }

    tracing::debug!(
        entries = entries.len(),
        removals = walk.removals.len(),
        duration,
        "flattened timeline"
    );
    Ok(Schedule {
        duration,
        entries,
        removals: walk.removals,
        graph: graph.clone(),
        index,
    })
}

impl Walk {
    fn visit(
        &mut self,
        graph: &SceneGraph,
        anim: &Animation,
        offset: f64,
        scale: f64,
    ) -> TimeweaveResult<()> {
        match anim {
            Animation::Primitive(p) => match p.action() {
                PrimitiveAction::Animate => {
                    for (kf, object) in p.writes() {
                        graph.object(object)?;
                        let span = TimeSpan::new(offset + kf.t0 * scale, offset + kf.t1 * scale)?;
                        self.writes.push(RawWrite {
                            span,
                            object,
                            property: kf.property.clone(),
                            change: kf.change.clone(),
                            ease: kf.ease,
                            order: self.order,
                        });
                        self.order += 1;
                    }
                    Ok(())
                }
                PrimitiveAction::Remove => {
                    for &target in p.targets() {
                        for id in graph.descendants(target)? {
                            let at = self.removals.entry(id).or_insert(offset);
                            *at = at.min(offset);
                        }
                    }
                    Ok(())
                }
            },
            Animation::Composite(c) => {
                let offsets = c.child_offsets()?;
                let scale = scale * c.time_scale()?;
                for (child, off) in c.children().iter().zip(offsets) {
                    self.visit(graph, child, offset + off * scale, scale)?;
                }
                Ok(())
            }
        }
    }
}

/// Value of one `(object, property)` at `t` given its entries sorted by `(start, order)`.
///
/// The active entry with the highest order wins; otherwise the most recently ended entry holds
/// its end state; otherwise the default applies.
pub(crate) fn resolve_at(
    entries: &[&ScheduleEntry],
    t: f64,
    default: &Value,
) -> TimeweaveResult<Value> {
    let started = &entries[..entries.partition_point(|e| e.span.start <= t)];

    if let Some(e) = started
        .iter()
        .filter(|e| e.span.contains(t))
        .max_by_key(|e| e.order)
    {
        return interpolate(&e.from, &e.to, e.span.fraction_at(t), e.ease);
    }

    let ended = started.iter().max_by(|a, b| {
        a.span
            .end
            .total_cmp(&b.span.end)
            .then(a.order.cmp(&b.order))
    });
    match ended {
        Some(e) => interpolate(&e.from, &e.to, 1.0, e.ease),
        None => Ok(default.clone()),
    }
}

fn hash_value(h: &mut StableHasher, v: &Value) {
    match v {
        Value::Scalar(x) => {
            h.write_u8(0);
            h.write_f64(*x);
        }
        Value::Vec2(p) => {
            h.write_u8(1);
            h.write_f64(p.x);
            h.write_f64(p.y);
        }
        Value::Vec3(p) => {
            h.write_u8(2);
            h.write_f64(p.x);
            h.write_f64(p.y);
            h.write_f64(p.z);
        }
        Value::Color(c) => {
            h.write_u8(3);
            for x in [c.r, c.g, c.b, c.a] {
                h.write_f64(x);
            }
        }
        Value::Gradient(stops) => {
            h.write_u8(4);
            h.write_u64(stops.len() as u64);
            for c in stops {
                for x in [c.r, c.g, c.b, c.a] {
                    h.write_f64(x);
                }
            }
        }
        Value::Text(s) => {
            h.write_u8(5);
            h.write_str(s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/flatten.rs"]
mod tests;
