//! Timeweave is a deterministic animation timeline engine.
//!
//! Scenes are described as data and resolved by pure functions of time:
//!
//! - Build a [`SceneGraph`] of objects with design-time property defaults
//! - Compose [`Primitive`] changes into an [`Animation`] tree (sequential, parallel, staggered)
//! - [`flatten`] the tree into an immutable [`Schedule`]
//! - Sample any instant into a [`SceneSnapshot`], or stream a frame range through a
//!   [`TimelineSession`] into a [`SnapshotSink`]
//!
//! Rasterization and encoding are left to downstream consumers of the snapshots.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Easing, values and interpolation.
pub mod animation;
/// Snapshot emission and sinks.
pub mod emit;
/// Scene graph and JSON document model.
pub mod scene;
/// Flattening and sampling.
pub mod schedule;
/// Frame loop over a finalized schedule.
pub mod session;
/// Primitives, composition operators and effect presets.
pub mod timeline;

pub use crate::foundation::core::{Fps, FrameIndex, FrameRange, TimeSpan, Vec2};
pub use crate::foundation::error::{TimeweaveError, TimeweaveResult};
pub use crate::foundation::fingerprint::Fingerprint;
pub use crate::foundation::ids::ObjectId;

pub use crate::animation::ease::Ease;
pub use crate::animation::interpolate::{Lerp, interpolate, interpolate_stops, sample_gradient};
pub use crate::animation::value::{Property, Rgba, Value, ValueKind, Vec3};
pub use crate::emit::sink::{InMemorySink, JsonLinesSink, SinkConfig, SnapshotSink};
pub use crate::emit::snapshot::{SceneSnapshot, SnapshotObject, emit};
pub use crate::scene::graph::{SceneGraph, SceneObject};
pub use crate::scene::model::{AnimationDef, TimelineDef};
pub use crate::schedule::flatten::{Schedule, ScheduleEntry, flatten};
pub use crate::schedule::sample::{ObjectState, ResolvedState};
pub use crate::session::timeline_session::{RenderStats, SessionOpts, TimelineSession};
pub use crate::timeline::composite::{Animation, Composite, CompositionMode};
pub use crate::timeline::primitive::{
    Change, Primitive, PrimitiveAction, PrimitiveBuilder, PropertyKeyframe,
};
