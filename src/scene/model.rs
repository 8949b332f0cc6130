//! Serde document model for timelines described in JSON.
//!
//! A document names its objects, groups them, and describes one animation tree that refers to
//! objects and groups by name. [`TimelineDef::build`] turns it into a graph plus animation.

use std::collections::BTreeMap;

use crate::animation::ease::Ease;
use crate::animation::value::{Property, Rgba, Value};
use crate::foundation::core::Vec2;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::foundation::ids::ObjectId;
use crate::scene::graph::SceneGraph;
use crate::timeline::composite::Animation;
use crate::timeline::dsl;
use crate::timeline::primitive::{Change, Primitive};

/// Supported document version.
pub const DOCUMENT_VERSION: &str = "1";

/// Top-level timeline document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimelineDef {
    /// Document version; must be `"1"`.
    pub version: String,
    /// Leaf objects, created under the root in order.
    #[serde(default)]
    pub objects: Vec<ObjectDef>,
    /// Groups, created in order; members may name objects or earlier groups.
    #[serde(default)]
    pub groups: Vec<GroupDef>,
    /// Animation tree.
    pub animation: AnimationDef,
}

/// A named object and its property defaults.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDef {
    /// Unique name.
    pub name: String,
    /// Design-time defaults.
    #[serde(default)]
    pub properties: BTreeMap<Property, Value>,
}

/// A named group over previously declared names.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDef {
    /// Unique name.
    pub name: String,
    /// Member names in order.
    pub members: Vec<String>,
}

/// One keyframe of a `primitive` node.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyframeDef {
    /// Animated property.
    pub property: Property,
    /// End-value rule, e.g. `{"to": {"scalar": 0.0}}`, `{"scale_by": 1.1}` or `"to_default"`.
    pub change: Change,
    /// Overrides the primitive's easing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    /// Local `[t0, t1]` window; the whole primitive when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<[f64; 2]>,
}

/// Node of the animation tree.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum AnimationDef {
    /// Explicit keyframes on named targets.
    Primitive {
        /// Object or group names.
        targets: Vec<String>,
        /// Seconds.
        duration: f64,
        /// Default easing for the keyframes.
        #[serde(default)]
        ease: Ease,
        /// Keyframes in order.
        keyframes: Vec<KeyframeDef>,
    },
    /// Children back to back.
    Sequential {
        /// Children in order.
        children: Vec<AnimationDef>,
        /// Rescale to this many seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_time: Option<f64>,
    },
    /// Children starting together.
    Parallel {
        /// Children in order.
        children: Vec<AnimationDef>,
        /// Rescale to this many seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_time: Option<f64>,
    },
    /// Children offset by a lag ratio.
    Staggered {
        /// Children in order; all must last equally long.
        children: Vec<AnimationDef>,
        /// Fraction of a child's duration between starts.
        lag_ratio: f64,
        /// Rescale to this many seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_time: Option<f64>,
    },
    /// Idle time.
    Wait {
        /// Seconds.
        duration: f64,
    },
    /// Detach targets from later snapshots.
    Remove {
        /// Object or group names.
        targets: Vec<String>,
    },
    /// See [`dsl::fade_in`].
    FadeIn {
        /// Object or group names.
        targets: Vec<String>,
        /// Seconds.
        duration: f64,
        /// Travel offset `[dx, dy]`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shift: Option<[f64; 2]>,
        /// Easing.
        #[serde(default)]
        ease: Ease,
    },
    /// See [`dsl::fade_out`].
    FadeOut {
        /// Object or group names.
        targets: Vec<String>,
        /// Seconds.
        duration: f64,
        /// Travel offset `[dx, dy]`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shift: Option<[f64; 2]>,
        /// Easing.
        #[serde(default)]
        ease: Ease,
    },
    /// See [`dsl::pulse`].
    Pulse {
        /// Object or group names.
        targets: Vec<String>,
        /// Peak scale factor.
        factor: f64,
        /// Seconds.
        duration: f64,
    },
    /// See [`dsl::set_color`].
    SetColor {
        /// Object or group names.
        targets: Vec<String>,
        /// Target fill color.
        color: Rgba,
        /// Seconds.
        duration: f64,
        /// Easing.
        #[serde(default)]
        ease: Ease,
    },
    /// See [`dsl::draw_border_then_fill`].
    DrawBorderThenFill {
        /// Object or group names.
        targets: Vec<String>,
        /// Seconds.
        duration: f64,
        /// Easing.
        #[serde(default)]
        ease: Ease,
    },
    /// See [`dsl::write`].
    Write {
        /// Object or group names.
        targets: Vec<String>,
        /// Seconds.
        duration: f64,
        /// Easing.
        #[serde(default)]
        ease: Ease,
    },
}

impl TimelineDef {
    /// Parse a JSON document.
    pub fn from_json(s: &str) -> TimeweaveResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> TimeweaveResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build the scene graph and the animation tree it describes.
    ///
    /// Names are resolved eagerly, so unknown targets fail here with `NotFound`.
    pub fn build(&self) -> TimeweaveResult<(SceneGraph, Animation)> {
        if self.version != DOCUMENT_VERSION {
            return Err(TimeweaveError::validation(format!(
                "unsupported document version '{}' (expected '{DOCUMENT_VERSION}')",
                self.version
            )));
        }

        let mut graph = SceneGraph::new();
        for obj in &self.objects {
            graph.create_named(obj.name.clone(), obj.properties.clone())?;
        }
        for grp in &self.groups {
            let members = resolve_names(&graph, &grp.members)?;
            graph.group_named(grp.name.clone(), &members)?;
        }

        let animation = self.animation.build(&graph)?;
        Ok((graph, animation))
    }
}

impl AnimationDef {
    /// Build this node against `graph`.
    pub fn build(&self, graph: &SceneGraph) -> TimeweaveResult<Animation> {
        match self {
            Self::Primitive {
                targets,
                duration,
                ease,
                keyframes,
            } => {
                let ids = resolve_names(graph, targets)?;
                let mut b = Primitive::builder(&ids, *duration);
                for kf in keyframes {
                    let kease = kf.ease.unwrap_or(*ease);
                    b = match kf.window {
                        Some([t0, t1]) => {
                            b.keyframe_in(kf.property.clone(), kf.change.clone(), kease, t0, t1)
                        }
                        None => b.keyframe(kf.property.clone(), kf.change.clone(), kease),
                    };
                }
                Ok(b.build(graph)?.into())
            }
            Self::Sequential { children, run_time } => {
                let anim = Animation::sequential(build_children(graph, children)?);
                with_run_time(anim, *run_time)
            }
            Self::Parallel { children, run_time } => {
                let anim = Animation::parallel(build_children(graph, children)?);
                with_run_time(anim, *run_time)
            }
            Self::Staggered {
                children,
                lag_ratio,
                run_time,
            } => {
                let anim = Animation::staggered(build_children(graph, children)?, *lag_ratio)?;
                with_run_time(anim, *run_time)
            }
            Self::Wait { duration } => Animation::wait(*duration),
            Self::Remove { targets } => {
                let ids = resolve_names(graph, targets)?;
                Ok(Primitive::remove(graph, &ids)?.into())
            }
            Self::FadeIn {
                targets,
                duration,
                shift,
                ease,
            } => dsl::fade_in(
                graph,
                &resolve_names(graph, targets)?,
                shift.map(|[x, y]| Vec2::new(x, y)),
                *duration,
                *ease,
            ),
            Self::FadeOut {
                targets,
                duration,
                shift,
                ease,
            } => dsl::fade_out(
                graph,
                &resolve_names(graph, targets)?,
                shift.map(|[x, y]| Vec2::new(x, y)),
                *duration,
                *ease,
            ),
            Self::Pulse {
                targets,
                factor,
                duration,
            } => dsl::pulse(graph, &resolve_names(graph, targets)?, *factor, *duration),
            Self::SetColor {
                targets,
                color,
                duration,
                ease,
            } => dsl::set_color(
                graph,
                &resolve_names(graph, targets)?,
                *color,
                *duration,
                *ease,
            ),
            Self::DrawBorderThenFill {
                targets,
                duration,
                ease,
            } => dsl::draw_border_then_fill(
                graph,
                &resolve_names(graph, targets)?,
                *duration,
                *ease,
            ),
            Self::Write {
                targets,
                duration,
                ease,
            } => dsl::write(graph, &resolve_names(graph, targets)?, *duration, *ease),
        }
    }
}

fn build_children(graph: &SceneGraph, children: &[AnimationDef]) -> TimeweaveResult<Vec<Animation>> {
    children.iter().map(|c| c.build(graph)).collect()
}

fn with_run_time(anim: Animation, run_time: Option<f64>) -> TimeweaveResult<Animation> {
    match run_time {
        Some(rt) => anim.with_run_time(rt),
        None => Ok(anim),
    }
}

fn resolve_names(graph: &SceneGraph, names: &[String]) -> TimeweaveResult<Vec<ObjectId>> {
    names.iter().map(|n| graph.lookup(n)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
