/// Composition operators (sequential, parallel, staggered).
pub mod composite;
/// Effect presets built from primitives and composites.
pub mod dsl;
/// Time-bounded property changes.
pub mod primitive;
