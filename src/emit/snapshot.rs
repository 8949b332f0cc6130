use std::collections::BTreeMap;

use crate::animation::value::{Property, Value};
use crate::foundation::error::TimeweaveResult;
use crate::foundation::ids::ObjectId;
use crate::scene::graph::SceneGraph;
use crate::schedule::flatten::Schedule;
use crate::schedule::sample::ResolvedState;

/// One object as handed to a downstream renderer.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SnapshotObject {
    /// Registered name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Parent id; `None` only for the root.
    pub parent: Option<ObjectId>,
    /// Children still present at this instant, in graph order.
    pub children: Vec<ObjectId>,
    /// Resolved property values.
    pub properties: BTreeMap<Property, Value>,
}

/// Frame descriptor for one instant: resolved properties plus the live hierarchy.
///
/// Serializes to JSON for external rasterizers and encoders.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SceneSnapshot {
    /// Sampled time in seconds.
    pub time: f64,
    /// Root object id.
    pub root: ObjectId,
    /// Present objects keyed by id.
    pub objects: BTreeMap<ObjectId, SnapshotObject>,
}

impl SceneSnapshot {
    /// Ids of present objects in depth-first pre-order from the root (paint order).
    pub fn paint_order(&self) -> Vec<ObjectId> {
        let mut out = Vec::with_capacity(self.objects.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(obj) = self.objects.get(&id) else {
                continue;
            };
            out.push(id);
            stack.extend(obj.children.iter().rev().copied());
        }
        out
    }
}

/// Attach hierarchy from `graph` to a resolved state.
///
/// Objects absent from `state` are pruned from every child list.
pub fn emit(graph: &SceneGraph, state: &ResolvedState) -> SceneSnapshot {
    let objects = graph
        .iter()
        .filter_map(|obj| {
            let resolved = state.objects.get(&obj.id())?;
            Some((
                obj.id(),
                SnapshotObject {
                    name: obj.name().map(str::to_owned),
                    parent: obj.parent(),
                    children: obj
                        .children()
                        .iter()
                        .copied()
                        .filter(|c| state.objects.contains_key(c))
                        .collect(),
                    properties: resolved.properties.clone(),
                },
            ))
        })
        .collect();
    SceneSnapshot {
        time: state.time,
        root: graph.root(),
        objects,
    }
}

impl Schedule {
    /// Sample at `t` and emit the frame descriptor.
    pub fn snapshot_at(&self, t: f64) -> TimeweaveResult<SceneSnapshot> {
        let state = self.sample(t)?;
        Ok(emit(self.graph(), &state))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/emit/snapshot.rs"]
mod tests;
