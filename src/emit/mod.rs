/// Snapshot sinks.
pub mod sink;
/// Frame descriptors for downstream renderers.
pub mod snapshot;
