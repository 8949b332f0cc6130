/// Depth-first flattening of animation trees into schedules.
pub mod flatten;
/// Point sampling of a finalized schedule.
pub mod sample;
