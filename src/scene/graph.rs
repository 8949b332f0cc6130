use std::collections::BTreeMap;

use crate::animation::value::{Property, Value};
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::foundation::ids::ObjectId;

/// A visual object: identity, design-time property defaults, and ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    id: ObjectId,
    name: Option<String>,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    properties: BTreeMap<Property, Value>,
}

impl SceneObject {
    /// Stable id.
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Optional unique name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Parent object; `None` only for the graph root.
    pub fn parent(&self) -> Option<ObjectId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[ObjectId] {
        &self.children
    }

    /// Design-time property defaults.
    pub fn properties(&self) -> &BTreeMap<Property, Value> {
        &self.properties
    }

    /// Return `true` when `property` is declared on this object.
    pub fn declares(&self, property: &Property) -> bool {
        self.properties.contains_key(property)
    }
}

/// Mutable hierarchy of scene objects rooted at a single root owned by the graph.
///
/// Property values stored here are design-time defaults; animated values live in the
/// [`Schedule`](crate::Schedule).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    root: ObjectId,
    objects: BTreeMap<ObjectId, SceneObject>,
    names: BTreeMap<String, ObjectId>,
    next_id: u32,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create an empty graph holding only the root.
    pub fn new() -> Self {
        let root = ObjectId(0);
        let mut objects = BTreeMap::new();
        objects.insert(
            root,
            SceneObject {
                id: root,
                name: None,
                parent: None,
                children: Vec::new(),
                properties: BTreeMap::new(),
            },
        );
        Self {
            root,
            objects,
            names: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Root object id.
    pub fn root(&self) -> ObjectId {
        self.root
    }

    /// Number of live objects, including the root.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Return `true` when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.objects.len() == 1
    }

    /// Return `true` when `id` is a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Create an object under the root with the given property defaults.
    pub fn create_object(
        &mut self,
        properties: impl IntoIterator<Item = (Property, Value)>,
    ) -> TimeweaveResult<ObjectId> {
        self.insert(None, properties)
    }

    /// Like [`SceneGraph::create_object`], registering a unique `name` for lookups.
    pub fn create_named(
        &mut self,
        name: impl Into<String>,
        properties: impl IntoIterator<Item = (Property, Value)>,
    ) -> TimeweaveResult<ObjectId> {
        let name = self.check_name(name.into())?;
        self.insert(Some(name), properties)
    }

    /// Create a group under the root and move `ids` into it, preserving their order.
    pub fn group(&mut self, ids: &[ObjectId]) -> TimeweaveResult<ObjectId> {
        self.check_members(ids)?;
        let gid = self.insert(None, std::iter::empty())?;
        self.adopt(gid, ids)?;
        Ok(gid)
    }

    /// Like [`SceneGraph::group`], registering a unique `name` for the group.
    pub fn group_named(
        &mut self,
        name: impl Into<String>,
        ids: &[ObjectId],
    ) -> TimeweaveResult<ObjectId> {
        let name = self.check_name(name.into())?;
        self.check_members(ids)?;
        let gid = self.insert(Some(name), std::iter::empty())?;
        self.adopt(gid, ids)?;
        Ok(gid)
    }

    /// Detach `id` and drop it together with all of its descendants.
    pub fn remove(&mut self, id: ObjectId) -> TimeweaveResult<()> {
        if id == self.root {
            return Err(TimeweaveError::validation("the scene root cannot be removed"));
        }
        let parent = self.object(id)?.parent;
        if let Some(p) = parent.and_then(|p| self.objects.get_mut(&p)) {
            p.children.retain(|&c| c != id);
        }
        for d in self.descendants(id)? {
            if let Some(obj) = self.objects.remove(&d)
                && let Some(name) = obj.name
            {
                self.names.remove(&name);
            }
        }
        tracing::debug!(%id, "removed object subtree");
        Ok(())
    }

    /// Borrow a live object.
    pub fn object(&self, id: ObjectId) -> TimeweaveResult<&SceneObject> {
        self.objects
            .get(&id)
            .ok_or_else(|| TimeweaveError::not_found(format!("object {id}")))
    }

    /// Resolve a registered name to its id.
    pub fn lookup(&self, name: &str) -> TimeweaveResult<ObjectId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| TimeweaveError::not_found(format!("object named '{name}'")))
    }

    /// Design-time default of `property` on `id`.
    pub fn get_property(&self, id: ObjectId, property: &Property) -> TimeweaveResult<&Value> {
        self.object(id)?
            .properties
            .get(property)
            .ok_or_else(|| TimeweaveError::not_found(format!("property '{property}' on {id}")))
    }

    /// Declare or overwrite a design-time default. Overwrites must keep the declared kind.
    pub fn set_property(
        &mut self,
        id: ObjectId,
        property: Property,
        value: Value,
    ) -> TimeweaveResult<()> {
        check_value(&property, &value)?;
        let obj = self
            .objects
            .get_mut(&id)
            .ok_or_else(|| TimeweaveError::not_found(format!("object {id}")))?;
        if let Some(old) = obj.properties.get(&property)
            && old.kind() != value.kind()
        {
            return Err(TimeweaveError::type_mismatch(format!(
                "property '{property}' on {id} is {} but got {}",
                old.kind(),
                value.kind()
            )));
        }
        obj.properties.insert(property, value);
        Ok(())
    }

    /// `id` followed by all of its descendants in depth-first pre-order.
    pub fn descendants(&self, id: ObjectId) -> TimeweaveResult<Vec<ObjectId>> {
        self.object(id)?;
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            if let Some(obj) = self.objects.get(&cur) {
                stack.extend(obj.children.iter().rev().copied());
            }
        }
        Ok(out)
    }

    /// Iterate live objects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    fn insert(
        &mut self,
        name: Option<String>,
        properties: impl IntoIterator<Item = (Property, Value)>,
    ) -> TimeweaveResult<ObjectId> {
        let properties: BTreeMap<Property, Value> = properties.into_iter().collect();
        for (p, v) in &properties {
            check_value(p, v)?;
        }

        let id = ObjectId(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| TimeweaveError::validation("object id space exhausted"))?;

        if let Some(name) = &name {
            self.names.insert(name.clone(), id);
        }
        self.objects.insert(
            id,
            SceneObject {
                id,
                name,
                parent: Some(self.root),
                children: Vec::new(),
                properties,
            },
        );
        if let Some(root) = self.objects.get_mut(&self.root) {
            root.children.push(id);
        }
        Ok(id)
    }

    fn check_name(&self, name: String) -> TimeweaveResult<String> {
        if name.trim().is_empty() {
            return Err(TimeweaveError::validation("object name must be non-empty"));
        }
        if self.names.contains_key(&name) {
            return Err(TimeweaveError::validation(format!(
                "duplicate object name '{name}'"
            )));
        }
        Ok(name)
    }

    fn check_members(&self, ids: &[ObjectId]) -> TimeweaveResult<()> {
        for (i, &id) in ids.iter().enumerate() {
            self.object(id)?;
            if id == self.root {
                return Err(TimeweaveError::validation("the scene root cannot be grouped"));
            }
            if ids[..i].contains(&id) {
                return Err(TimeweaveError::validation(format!(
                    "object {id} listed twice in group"
                )));
            }
        }
        Ok(())
    }

    fn adopt(&mut self, gid: ObjectId, ids: &[ObjectId]) -> TimeweaveResult<()> {
        for &id in ids {
            let old_parent = self.object(id)?.parent;
            if let Some(p) = old_parent.and_then(|p| self.objects.get_mut(&p)) {
                p.children.retain(|&c| c != id);
            }
            if let Some(obj) = self.objects.get_mut(&id) {
                obj.parent = Some(gid);
            }
        }
        if let Some(group) = self.objects.get_mut(&gid) {
            group.children.extend_from_slice(ids);
        }
        Ok(())
    }
}

/// Reject values no renderer can use: non-finite numbers and empty gradients.
pub(crate) fn check_value(property: &Property, value: &Value) -> TimeweaveResult<()> {
    let finite = match value {
        Value::Scalar(v) => v.is_finite(),
        Value::Vec2(v) => v.x.is_finite() && v.y.is_finite(),
        Value::Vec3(v) => v.x.is_finite() && v.y.is_finite() && v.z.is_finite(),
        Value::Color(c) => [c.r, c.g, c.b, c.a].iter().all(|x| x.is_finite()),
        Value::Gradient(stops) => {
            if stops.is_empty() {
                return Err(TimeweaveError::validation(format!(
                    "gradient for '{property}' must have at least one stop"
                )));
            }
            stops
                .iter()
                .all(|c| [c.r, c.g, c.b, c.a].iter().all(|x| x.is_finite()))
        }
        Value::Text(_) => true,
    };
    if !finite {
        return Err(TimeweaveError::validation(format!(
            "value for '{property}' must be finite"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
