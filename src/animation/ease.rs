/// Easing functions used to map normalized animation progress.
///
/// Every easing is a pure function `[0, 1] -> [0, 1]` with `f(0) == 0`. All of them end at
/// `f(1) == 1` except [`Ease::ThereAndBack`], which returns to `0` and peaks at `f(0.5) == 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    /// Linear interpolation.
    #[default]
    Linear,
    /// Quadratic ease-in.
    #[serde(alias = "ease_in")]
    InQuad,
    /// Quadratic ease-out.
    #[serde(alias = "ease_out")]
    OutQuad,
    /// Quadratic ease-in/out.
    #[serde(alias = "ease_in_out")]
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Smoothstep (`3t² - 2t³`).
    Smooth,
    /// First half of [`Ease::Smooth`] stretched over the whole range: slow start, full speed at the end.
    RushInto,
    /// Second half of [`Ease::Smooth`] stretched over the whole range: full speed start, slow end.
    RushFrom,
    /// Smooth out-and-return used for pulse/flash effects.
    ThereAndBack,
}

impl Ease {
    /// Every built-in easing, in declaration order.
    pub const ALL: [Ease; 11] = [
        Ease::Linear,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
        Ease::Smooth,
        Ease::RushInto,
        Ease::RushFrom,
        Ease::ThereAndBack,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::Smooth => smoothstep(t),
            Self::RushInto => 2.0 * smoothstep(t / 2.0),
            Self::RushFrom => 2.0 * smoothstep(t / 2.0 + 0.5) - 1.0,
            Self::ThereAndBack => {
                let u = if t < 0.5 { 2.0 * t } else { 2.0 - 2.0 * t };
                smoothstep(u)
            }
        }
    }

    /// Return `true` when `apply(1.0) == 1.0`, i.e. the animated value settles on its target.
    pub fn ends_at_target(self) -> bool {
        !matches!(self, Self::ThereAndBack)
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
