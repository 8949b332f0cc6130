use std::collections::BTreeMap;

use crate::animation::value::{Property, Value};
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::foundation::ids::ObjectId;
use crate::schedule::flatten::{Schedule, resolve_at};

/// Resolved properties of one live object.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ObjectState {
    /// Every declared property at the sampled instant.
    pub properties: BTreeMap<Property, Value>,
}

/// Full resolved scene state at one instant.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolvedState {
    /// Sampled time in seconds.
    pub time: f64,
    /// Live objects (removed ones are absent), keyed by id.
    pub objects: BTreeMap<ObjectId, ObjectState>,
}

impl Schedule {
    /// Resolve every live object's properties at absolute time `t`.
    ///
    /// Before any write an object shows its defaults; after its last write it holds the final
    /// resolved value. Non-finite `t` is rejected.
    pub fn sample(&self, t: f64) -> TimeweaveResult<ResolvedState> {
        let t = check_time(t)?;
        let mut objects = BTreeMap::new();
        for obj in self.graph().iter() {
            if self.is_removed_at(obj.id(), t) {
                continue;
            }
            let mut properties = BTreeMap::new();
            for (property, default) in obj.properties() {
                let value = if self.has_writes(obj.id(), property) {
                    resolve_at(&self.entries_for(obj.id(), property), t, default)?
                } else {
                    default.clone()
                };
                properties.insert(property.clone(), value);
            }
            objects.insert(obj.id(), ObjectState { properties });
        }
        Ok(ResolvedState { time: t, objects })
    }

    /// Resolved value of `(object, property)` at absolute time `t`.
    ///
    /// Fails with `NotFound` when the object or property is unknown to the graph. Removal does
    /// not affect the result.
    pub fn value_at(
        &self,
        object: ObjectId,
        property: &Property,
        t: f64,
    ) -> TimeweaveResult<Value> {
        let t = check_time(t)?;
        let default = self.graph().get_property(object, property)?;
        resolve_at(&self.entries_for(object, property), t, default)
    }
}

fn check_time(t: f64) -> TimeweaveResult<f64> {
    if !t.is_finite() {
        return Err(TimeweaveError::validation(format!(
            "sample time must be finite (got {t})"
        )));
    }
    Ok(t)
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/sample.rs"]
mod tests;
