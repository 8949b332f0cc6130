use crate::foundation::error::{TimeweaveError, TimeweaveResult};

pub use kurbo::Vec2;

/// Absolute 0-based frame index in timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> TimeweaveResult<Self> {
        if start.0 > end.0 {
            return Err(TimeweaveError::invalid_interval(
                "FrameRange start must be <= end",
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32, // must be > 0
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> TimeweaveResult<Self> {
        if den == 0 {
            return Err(TimeweaveError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(TimeweaveError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Timeline time (seconds) at which frame `f` is sampled.
    pub fn frame_to_secs(self, f: FrameIndex) -> f64 {
        (f.0 as f64) * f64::from(self.den) / f64::from(self.num)
    }

    /// Number of frames needed to cover `secs`, rounding up so the final state is included.
    ///
    /// A zero-length timeline still yields one frame (the state at `t = 0`).
    pub fn frames_covering(self, secs: f64) -> u64 {
        if !secs.is_finite() || secs <= 0.0 {
            return 1;
        }
        (secs * self.as_f64()).ceil() as u64 + 1
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self { num: 30, den: 1 }
    }
}

/// Half-open time interval `[start, end)` in seconds on the absolute timeline.
///
/// `start == end` is an instantaneous mutation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeSpan {
    /// Inclusive start.
    pub start: f64,
    /// Exclusive end.
    pub end: f64,
}

impl TimeSpan {
    /// Create a validated span with finite bounds and `start <= end`.
    pub fn new(start: f64, end: f64) -> TimeweaveResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TimeweaveError::invalid_interval(format!(
                "span bounds must be finite (got [{start}, {end}])"
            )));
        }
        if start > end {
            return Err(TimeweaveError::invalid_interval(format!(
                "span start must be <= end (got [{start}, {end}])"
            )));
        }
        Ok(Self { start, end })
    }

    /// Span length in seconds.
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    /// Return `true` for an instantaneous span.
    pub fn is_instant(self) -> bool {
        self.start == self.end
    }

    /// Return `true` when `t` is inside `[start, end)`.
    pub fn contains(self, t: f64) -> bool {
        self.start <= t && t < self.end
    }

    /// Normalized progress of `t` through the span.
    ///
    /// Instantaneous spans report `1.0`. The result is not clamped.
    pub fn fraction_at(self, t: f64) -> f64 {
        if self.is_instant() {
            1.0
        } else {
            (t - self.start) / (self.end - self.start)
        }
    }
}

/// Validate a duration in seconds (`finite` and `>= 0`).
pub(crate) fn check_duration(what: &str, secs: f64) -> TimeweaveResult<f64> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(TimeweaveError::invalid_interval(format!(
            "{what} must be finite and >= 0 (got {secs})"
        )));
    }
    Ok(secs)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
