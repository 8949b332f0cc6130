/// Scene graph of named visual objects.
pub mod graph;
/// JSON document model for timelines.
pub mod model;
