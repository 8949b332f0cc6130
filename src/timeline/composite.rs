use crate::foundation::core::check_duration;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::timeline::primitive::Primitive;

// Relative tolerance used when checking that staggered children share one duration.
const STAGGER_DURATION_EPS: f64 = 1e-9;

/// How a composite arranges its children in time.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositionMode {
    /// Child `i + 1` starts when child `i` ends.
    Sequential,
    /// All children start together.
    Parallel,
    /// Child `i` starts at `i * lag_ratio * base_duration`.
    Staggered {
        /// Fraction of one child's duration between successive starts (`>= 0`).
        lag_ratio: f64,
    },
}

/// Ordered children combined by one [`CompositionMode`].
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    mode: CompositionMode,
    children: Vec<Animation>,
    run_time: Option<f64>,
}

impl Composite {
    /// Composition mode.
    pub fn mode(&self) -> CompositionMode {
        self.mode
    }

    /// Children in composition order.
    pub fn children(&self) -> &[Animation] {
        &self.children
    }

    /// Requested run time, if the natural duration is being rescaled.
    pub fn run_time(&self) -> Option<f64> {
        self.run_time
    }

    /// Duration before any run-time override.
    pub fn natural_duration(&self) -> TimeweaveResult<f64> {
        let durations = self.child_durations()?;
        let offsets = self.offsets_for(&durations)?;
        Ok(offsets
            .iter()
            .zip(&durations)
            .map(|(o, d)| o + d)
            .fold(0.0, f64::max))
    }

    /// Multiplier applied to child timing so the composite lasts its run time.
    ///
    /// A composite with zero natural duration ignores the override.
    pub fn time_scale(&self) -> TimeweaveResult<f64> {
        let Some(rt) = self.run_time else {
            return Ok(1.0);
        };
        let natural = self.natural_duration()?;
        if natural == 0.0 {
            return Ok(1.0);
        }
        Ok(rt / natural)
    }

    /// Start offsets of each child, in natural (unscaled) seconds from the composite start.
    pub fn child_offsets(&self) -> TimeweaveResult<Vec<f64>> {
        let durations = self.child_durations()?;
        self.offsets_for(&durations)
    }

    fn child_durations(&self) -> TimeweaveResult<Vec<f64>> {
        self.children.iter().map(Animation::duration).collect()
    }

    fn offsets_for(&self, durations: &[f64]) -> TimeweaveResult<Vec<f64>> {
        match self.mode {
            CompositionMode::Sequential => {
                let mut acc = 0.0;
                Ok(durations
                    .iter()
                    .map(|d| {
                        let off = acc;
                        acc += d;
                        off
                    })
                    .collect())
            }
            CompositionMode::Parallel => Ok(vec![0.0; durations.len()]),
            CompositionMode::Staggered { lag_ratio } => {
                let Some(&base) = durations.first() else {
                    return Ok(Vec::new());
                };
                let tol = STAGGER_DURATION_EPS * base.abs().max(1.0);
                if let Some((i, d)) = durations
                    .iter()
                    .enumerate()
                    .find(|(_, d)| (*d - base).abs() > tol)
                {
                    return Err(TimeweaveError::malformed_composite(format!(
                        "staggered children must share one duration: child 0 lasts {base}s but child {i} lasts {d}s"
                    )));
                }
                Ok((0..durations.len())
                    .map(|i| i as f64 * lag_ratio * base)
                    .collect())
            }
        }
    }
}

/// A primitive or a composite tree of animations.
///
/// Composition is purely structural: nothing is scheduled until the tree is flattened.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Leaf.
    Primitive(Primitive),
    /// Inner node.
    Composite(Composite),
}

impl Animation {
    /// Children run back to back.
    pub fn sequential(children: impl IntoIterator<Item = Animation>) -> Self {
        Self::composite(CompositionMode::Sequential, children)
    }

    /// Children all start at the composite start; later children override earlier ones where
    /// they write the same property at the same time.
    pub fn parallel(children: impl IntoIterator<Item = Animation>) -> Self {
        Self::composite(CompositionMode::Parallel, children)
    }

    /// Children start `lag_ratio` of one child's duration apart.
    pub fn staggered(
        children: impl IntoIterator<Item = Animation>,
        lag_ratio: f64,
    ) -> TimeweaveResult<Self> {
        if !lag_ratio.is_finite() || lag_ratio < 0.0 {
            return Err(TimeweaveError::invalid_interval(format!(
                "lag ratio must be finite and >= 0 (got {lag_ratio})"
            )));
        }
        Ok(Self::composite(
            CompositionMode::Staggered { lag_ratio },
            children,
        ))
    }

    /// An empty stretch of `secs` seconds.
    pub fn wait(secs: f64) -> TimeweaveResult<Self> {
        Ok(Self::Primitive(Primitive::wait(secs)?))
    }

    /// Rescale this animation to last exactly `secs` seconds.
    pub fn with_run_time(self, secs: f64) -> TimeweaveResult<Self> {
        let secs = check_duration("run time", secs)?;
        Ok(match self {
            Self::Composite(mut c) => {
                c.run_time = Some(secs);
                Self::Composite(c)
            }
            prim @ Self::Primitive(_) => Self::Composite(Composite {
                mode: CompositionMode::Parallel,
                children: vec![prim],
                run_time: Some(secs),
            }),
        })
    }

    /// Total duration in seconds.
    ///
    /// Fails with `MalformedComposite` when a staggered node's children disagree on duration.
    pub fn duration(&self) -> TimeweaveResult<f64> {
        match self {
            Self::Primitive(p) => Ok(p.duration()),
            Self::Composite(c) => {
                let natural = c.natural_duration()?;
                match c.run_time {
                    Some(rt) if natural > 0.0 => Ok(rt),
                    _ => Ok(natural),
                }
            }
        }
    }

    fn composite(mode: CompositionMode, children: impl IntoIterator<Item = Animation>) -> Self {
        Self::Composite(Composite {
            mode,
            children: children.into_iter().collect(),
            run_time: None,
        })
    }
}

impl From<Primitive> for Animation {
    fn from(p: Primitive) -> Self {
        Self::Primitive(p)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/composite.rs"]
mod tests;
