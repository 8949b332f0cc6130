use crate::animation::ease::Ease;
use crate::animation::value::{Rgba, Value, Vec3};
use crate::foundation::core::Vec2;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};

/// Interpolation contract for animatable payload types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.lerp(*b, t)
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

impl Lerp for Rgba {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }
}

/// Check that `fraction` lies in `[0, 1]`. No clamping is performed.
pub fn check_fraction(fraction: f64) -> TimeweaveResult<f64> {
    if !(0.0..=1.0).contains(&fraction) {
        return Err(TimeweaveError::invalid_fraction(format!(
            "fraction must be within [0, 1] (got {fraction})"
        )));
    }
    Ok(fraction)
}

/// Interpolate between two values of the same kind.
///
/// `fraction` is raw progress in `[0, 1]`; `ease` remaps it before blending. When the eased
/// progress is exactly `0` or `1` the corresponding endpoint is returned unchanged.
pub fn interpolate(
    start: &Value,
    end: &Value,
    fraction: f64,
    ease: Ease,
) -> TimeweaveResult<Value> {
    let fraction = check_fraction(fraction)?;
    if start.kind() != end.kind() {
        return Err(TimeweaveError::type_mismatch(format!(
            "cannot interpolate {} into {}",
            start.kind(),
            end.kind()
        )));
    }

    let t = ease.apply(fraction);
    if t == 0.0 {
        return Ok(start.clone());
    }
    if t == 1.0 {
        return Ok(end.clone());
    }
    Ok(blend(start, end, t))
}

/// Map `fraction` across an ordered stop sequence and interpolate between the two bracketing stops.
///
/// Stops are evenly spaced over `[0, 1]`; for colors this evaluates a multi-stop gradient.
pub fn interpolate_stops(stops: &[Value], fraction: f64, ease: Ease) -> TimeweaveResult<Value> {
    let fraction = check_fraction(fraction)?;
    let Some(first) = stops.first() else {
        return Err(TimeweaveError::validation(
            "stop sequence must have at least one stop",
        ));
    };
    if let Some(bad) = stops.iter().find(|s| s.kind() != first.kind()) {
        return Err(TimeweaveError::type_mismatch(format!(
            "stop sequence mixes {} and {}",
            first.kind(),
            bad.kind()
        )));
    }

    let t = ease.apply(fraction);
    let (i, local) = bracket(stops.len(), t);
    if local == 0.0 {
        return Ok(stops[i].clone());
    }
    Ok(blend(&stops[i], &stops[i + 1], local))
}

/// Evaluate a gradient at position `t` in `[0, 1]`.
pub fn sample_gradient(stops: &[Rgba], t: f64) -> Option<Rgba> {
    let first = stops.first()?;
    if stops.len() == 1 {
        return Some(*first);
    }
    let (i, local) = bracket(stops.len(), t);
    if local == 0.0 {
        return Some(stops[i]);
    }
    Some(Rgba::lerp(&stops[i], &stops[i + 1], local))
}

// Index of the lower bracketing stop and the local progress towards the next one.
fn bracket(len: usize, t: f64) -> (usize, f64) {
    if len < 2 {
        return (0, 0.0);
    }
    let segments = (len - 1) as f64;
    let pos = t.clamp(0.0, 1.0) * segments;
    let i = (pos.floor() as usize).min(len - 2);
    let local = pos - i as f64;
    if local >= 1.0 {
        (i + 1, 0.0)
    } else {
        (i, local)
    }
}

// Kinds have already been checked to match.
fn blend(a: &Value, b: &Value, t: f64) -> Value {
    match (a, b) {
        (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(<f64 as Lerp>::lerp(a, b, t)),
        (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(<Vec2 as Lerp>::lerp(a, b, t)),
        (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(Vec3::lerp(a, b, t)),
        (Value::Color(a), Value::Color(b)) => Value::Color(Rgba::lerp(a, b, t)),
        (Value::Color(c), Value::Gradient(g)) => lerp_gradients(std::slice::from_ref(c), g, t),
        (Value::Gradient(g), Value::Color(c)) => lerp_gradients(g, std::slice::from_ref(c), t),
        (Value::Gradient(a), Value::Gradient(b)) => lerp_gradients(a, b, t),
        // Text is discrete: hold the start until the window completes.
        _ => a.clone(),
    }
}

fn lerp_gradients(a: &[Rgba], b: &[Rgba], t: f64) -> Value {
    let n = a.len().max(b.len());
    let a = resample(a, n);
    let b = resample(b, n);
    Value::Gradient(
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| Rgba::lerp(x, y, t))
            .collect(),
    )
}

fn resample(stops: &[Rgba], n: usize) -> Vec<Rgba> {
    if stops.len() == n {
        return stops.to_vec();
    }
    if n < 2 {
        return stops.iter().take(n).copied().collect();
    }
    (0..n)
        .filter_map(|i| sample_gradient(stops, i as f64 / (n - 1) as f64))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interpolate.rs"]
mod tests;
