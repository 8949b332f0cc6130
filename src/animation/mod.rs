/// Easing curves.
pub mod ease;
/// Property interpolation.
pub mod interpolate;
/// Property names and animatable values.
pub mod value;
