use rayon::prelude::*;

use crate::emit::sink::{SinkConfig, SnapshotSink};
use crate::emit::snapshot::SceneSnapshot;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{TimeweaveError, TimeweaveResult};
use crate::scene::graph::SceneGraph;
use crate::schedule::flatten::{Schedule, flatten};
use crate::timeline::composite::Animation;

/// Options controlling frame sampling in a [`TimelineSession`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionOpts {
    /// Frame rate used to map frame indices to seconds.
    pub fps: Fps,
    /// Sample frames in parallel (rayon) on a dedicated thread pool.
    pub parallel: bool,
    /// Override the number of rayon worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Frames sampled per parallel batch before being pushed to the sink.
    pub chunk_size: usize,
}

impl Default for SessionOpts {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            parallel: false,
            threads: None,
            chunk_size: 64,
        }
    }
}

/// Range render statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames pushed to the sink.
    pub frames_total: u64,
    /// Batches sampled (one per frame when sequential).
    pub chunks: u64,
}

/// Frame loop over a finalized [`Schedule`].
///
/// The schedule is flattened once at construction and only read afterwards, so parallel sampling
/// shares it without locks.
pub struct TimelineSession {
    schedule: Schedule,
    opts: SessionOpts,
}

impl TimelineSession {
    /// Flatten `animation` against `graph` and prepare a session.
    #[tracing::instrument(skip(graph, animation))]
    pub fn new(
        graph: &SceneGraph,
        animation: &Animation,
        opts: SessionOpts,
    ) -> TimeweaveResult<Self> {
        if opts.threads == Some(0) {
            return Err(TimeweaveError::validation(
                "session 'threads' must be >= 1 when set",
            ));
        }
        let schedule = flatten(graph, animation)?;
        Ok(Self::from_schedule(schedule, opts))
    }

    /// Wrap an already flattened schedule.
    pub fn from_schedule(schedule: Schedule, opts: SessionOpts) -> Self {
        Self { schedule, opts }
    }

    /// Underlying schedule.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Session options.
    pub fn opts(&self) -> &SessionOpts {
        &self.opts
    }

    /// Timeline duration in seconds.
    pub fn duration(&self) -> f64 {
        self.schedule.duration()
    }

    /// Frames needed to cover `[0, duration]` inclusive of the final instant.
    pub fn frame_count(&self) -> u64 {
        self.opts.fps.frames_covering(self.duration())
    }

    /// Snapshot at an arbitrary time in seconds.
    pub fn snapshot_at(&self, t: f64) -> TimeweaveResult<SceneSnapshot> {
        self.schedule.snapshot_at(t)
    }

    /// Snapshot at `frame / fps`.
    pub fn render_frame(&self, frame: FrameIndex) -> TimeweaveResult<SceneSnapshot> {
        if frame.0 >= self.frame_count() {
            return Err(TimeweaveError::validation(
                "render_frame frame must be within timeline duration",
            ));
        }
        self.schedule.snapshot_at(self.opts.fps.frame_to_secs(frame))
    }

    /// Sample a frame range and stream snapshots into a sink.
    ///
    /// The sink receives snapshots in strictly increasing frame order. With `parallel`, each
    /// chunk is sampled on the pool and pushed in order once complete.
    #[tracing::instrument(skip(self, sink), fields(start = range.start.0, end = range.end.0))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn SnapshotSink,
    ) -> TimeweaveResult<RenderStats> {
        if range.is_empty() {
            return Err(TimeweaveError::validation(
                "render_range range must be non-empty",
            ));
        }
        if range.end.0 > self.frame_count() {
            return Err(TimeweaveError::validation(
                "render_range range must be within timeline duration",
            ));
        }

        let pool = if self.opts.parallel {
            Some(build_thread_pool(self.opts.threads)?)
        } else {
            None
        };

        sink.begin(SinkConfig {
            fps: self.opts.fps,
            frame_count: range.len_frames(),
            duration: self.duration(),
        })?;

        let mut stats = RenderStats::default();
        match pool.as_ref() {
            Some(pool) => {
                let chunk_size = normalized_chunk_size(self.opts.chunk_size);
                let mut chunk_start = range.start.0;
                while chunk_start < range.end.0 {
                    let chunk_end = chunk_start.saturating_add(chunk_size).min(range.end.0);
                    let snapshots: Vec<TimeweaveResult<SceneSnapshot>> = pool.install(|| {
                        (0..(chunk_end - chunk_start) as usize)
                            .into_par_iter()
                            .map(|i| self.render_frame(FrameIndex(chunk_start + i as u64)))
                            .collect()
                    });
                    for (f, snap) in (chunk_start..chunk_end).zip(snapshots) {
                        sink.push_snapshot(FrameIndex(f), &snap?)?;
                        stats.frames_total += 1;
                    }
                    stats.chunks += 1;
                    chunk_start = chunk_end;
                }
            }
            None => {
                for f in range.start.0..range.end.0 {
                    let snap = self.render_frame(FrameIndex(f))?;
                    tracing::trace!(frame = f, time = snap.time, "sampled frame");
                    sink.push_snapshot(FrameIndex(f), &snap)?;
                    stats.frames_total += 1;
                    stats.chunks += 1;
                }
            }
        }

        sink.end()?;
        tracing::debug!(frames = stats.frames_total, "rendered range");
        Ok(stats)
    }

    /// Sample every frame of the timeline into `sink`.
    pub fn render_all(&self, sink: &mut dyn SnapshotSink) -> TimeweaveResult<RenderStats> {
        let range = FrameRange::new(FrameIndex(0), FrameIndex(self.frame_count()))?;
        self.render_range(range, sink)
    }
}

fn normalized_chunk_size(chunk_size: usize) -> u64 {
    if chunk_size == 0 {
        1
    } else {
        chunk_size as u64
    }
}

fn build_thread_pool(threads: Option<usize>) -> TimeweaveResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(TimeweaveError::validation(
            "session 'threads' must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder.build().map_err(|e| {
        TimeweaveError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}"))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/timeline_session.rs"]
mod tests;
